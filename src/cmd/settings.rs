use crate::data::AppSettings;
use anyhow::Result;

pub fn run() -> Result<()> {
    let settings = AppSettings::load()?;
    write_settings(&settings, &mut std::io::stdout())
}

pub(crate) fn write_settings<W: std::io::Write>(settings: &AppSettings, out: &mut W) -> Result<()> {
    writeln!(out, "Settings")?;
    writeln!(out, "---")?;
    writeln!(out, "  {:<18} {}", "focus_minutes", settings.focus_minutes)?;
    writeln!(out, "  {:<18} {}", "step_minutes", settings.step_minutes)?;
    writeln!(out, "  {:<18} {}", "start_collapsed", settings.start_collapsed)?;
    writeln!(out, "  {:<18} {}", "log_level", settings.log_level)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_settings_defaults() {
        let mut buf = Vec::new();
        write_settings(&AppSettings::default(), &mut buf).unwrap();
        let out = String::from_utf8(buf).unwrap();
        assert!(out.starts_with("Settings\n---\n"));
        assert!(out.contains("focus_minutes      30"));
        assert!(out.contains("step_minutes       5"));
        assert!(out.contains("start_collapsed    false"));
        assert!(out.contains("log_level          info"));
    }
}
