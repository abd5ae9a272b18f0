use std::fmt::{Display, Formatter};

use crate::model::OpenAction;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchError {
    EmptyUrl,
    InvalidUrl(String),
    LaunchFailed { message: String, code: Option<i32> },
}

impl Display for LaunchError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyUrl => write!(f, "empty url"),
            Self::InvalidUrl(url) => write!(f, "not an openable url: {url}"),
            Self::LaunchFailed { message, code } => match code {
                Some(code) => write!(f, "{message} (code={code})"),
                None => write!(f, "{message}"),
            },
        }
    }
}

impl std::error::Error for LaunchError {}

pub fn open_action(action: &OpenAction) -> Result<(), LaunchError> {
    match action {
        OpenAction::OpenUrl { url } => {
            let url = validate_url(url)?;
            launch_url(url)
        }
    }
}

/// Accepts anything with a URI scheme (`https:`, `file:`, `chrome:`, ...).
pub fn validate_url(url: &str) -> Result<&str, LaunchError> {
    let trimmed = url.trim();
    if trimmed.is_empty() {
        return Err(LaunchError::EmptyUrl);
    }

    let Some((scheme, rest)) = trimmed.split_once(':') else {
        return Err(LaunchError::InvalidUrl(trimmed.to_string()));
    };
    let valid_scheme = scheme
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic())
        && scheme
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    if !valid_scheme || rest.is_empty() || trimmed.chars().any(char::is_control) {
        return Err(LaunchError::InvalidUrl(trimmed.to_string()));
    }

    Ok(trimmed)
}

#[cfg(target_os = "windows")]
fn launch_url(url: &str) -> Result<(), LaunchError> {
    use windows_sys::Win32::UI::Shell::ShellExecuteW;
    use windows_sys::Win32::UI::WindowsAndMessaging::SW_SHOWNORMAL;

    let operation = to_wide("open");
    let target = to_wide(url);
    let result = unsafe {
        ShellExecuteW(
            std::ptr::null_mut(),
            operation.as_ptr(),
            target.as_ptr(),
            std::ptr::null(),
            std::ptr::null(),
            SW_SHOWNORMAL,
        )
    } as isize;

    if result <= 32 {
        return Err(LaunchError::LaunchFailed {
            message: format!("couldn't open '{url}'"),
            code: Some(result as i32),
        });
    }
    Ok(())
}

#[cfg(target_os = "windows")]
fn to_wide(value: &str) -> Vec<u16> {
    use std::os::windows::ffi::OsStrExt;

    std::ffi::OsStr::new(value)
        .encode_wide()
        .chain(std::iter::once(0))
        .collect()
}

#[cfg(not(target_os = "windows"))]
fn launch_url(url: &str) -> Result<(), LaunchError> {
    let opener = if cfg!(target_os = "macos") {
        "open"
    } else {
        "xdg-open"
    };
    std::process::Command::new(opener)
        .arg(url)
        .spawn()
        .map(|_| ())
        .map_err(|e| LaunchError::LaunchFailed {
            message: format!("couldn't open '{url}' with {opener}: {e}"),
            code: e.raw_os_error(),
        })
}
