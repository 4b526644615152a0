use crate::data::AppSettings;
use crate::state::SystemClock;
use crate::ui::calendar_view::{run_app, App};
use crate::ui::{restore_terminal, setup_terminal};
use anyhow::Result;
use tracing::info;

pub fn run() -> Result<()> {
    let settings = AppSettings::load()?;
    info!(?settings, "starting interactive calendar");

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = crossterm::terminal::disable_raw_mode();
        let _ = crossterm::execute!(
            std::io::stdout(),
            crossterm::terminal::LeaveAlternateScreen,
            crossterm::event::DisableMouseCapture
        );
        original_hook(info);
    }));

    let mut terminal = setup_terminal()?;
    let mut app = App::new(&settings, Box::new(SystemClock));

    let result = run_app(&mut terminal, &mut app);

    restore_terminal(&mut terminal)?;
    result
}
