mod command;
mod observer;
mod tui;
mod ui;
mod util;

fn main() -> anyhow::Result<()> {
    command::run()
}
