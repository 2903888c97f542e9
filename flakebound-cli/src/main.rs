fn main() -> anyhow::Result<()> {
    flakebound_cli::run()
}
