use hueshape::PickerKind;
use std::num::ParseIntError;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    Show,
    Reload,
    SetCount(usize),
    SetVariant(PickerKind),
    ConfigReload,
}

#[derive(Error, Debug)]
pub enum ControlError {
    #[error("Unknown command: {0}")]
    UnknownCommand(String),
    #[error("Missing argument for '{0}'")]
    MissingArgument(&'static str),
    #[error("Invalid color count: {0}")]
    InvalidCount(#[from] ParseIntError),
    #[error("Invalid picker variant: {0}")]
    InvalidVariant(#[from] strum::ParseError),
    #[error("Control socket error: {0}")]
    Io(#[from] std::io::Error),
}

/// Parses one line of the control socket protocol.
impl FromStr for AppEvent {
    type Err = ControlError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let command = words.next().unwrap_or_default();

        match command {
            "show" => Ok(AppEvent::Show),
            "reload" => Ok(AppEvent::Reload),
            "count" => {
                let arg = words.next().ok_or(ControlError::MissingArgument("count"))?;
                Ok(AppEvent::SetCount(arg.parse()?))
            }
            "variant" => {
                let arg = words.next().ok_or(ControlError::MissingArgument("variant"))?;
                Ok(AppEvent::SetVariant(arg.parse()?))
            }
            other => Err(ControlError::UnknownCommand(other.to_string())),
        }
    }
}
