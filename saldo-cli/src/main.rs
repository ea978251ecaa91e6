use anyhow::Result;

fn main() -> Result<()> {
    saldo_cli::app::run()
}
