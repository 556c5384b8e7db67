/// Cosmetic process naming.
///
/// Gives the launcher a recognizable name in `ps`/`top`. Nothing depends on
/// it succeeding: callers log the error and move on.
use std::ffi::CString;
use std::fmt;

/// Capability for renaming the current process in process listings.
pub trait ProcessLabel: Send + Sync {
    fn apply(&self, label: &str) -> Result<(), LabelError>;
}

/// Errors from relabeling the process.
#[derive(Debug)]
pub enum LabelError {
    /// The label contains an interior NUL byte.
    InvalidLabel { label: String },
    /// The OS rejected the rename.
    #[cfg_attr(not(target_os = "linux"), allow(dead_code))]
    Os { source: std::io::Error },
}

impl fmt::Display for LabelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LabelError::InvalidLabel { label } => {
                write!(f, "process label {label:?} contains a NUL byte")
            }
            LabelError::Os { source } => write!(f, "failed to set process name: {source}"),
        }
    }
}

impl std::error::Error for LabelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LabelError::InvalidLabel { .. } => None,
            LabelError::Os { source } => Some(source),
        }
    }
}

fn to_c_label(label: &str) -> Result<CString, LabelError> {
    CString::new(label).map_err(|_| LabelError::InvalidLabel {
        label: label.to_string(),
    })
}

/// Does nothing. Used where the platform has no rename facility.
#[cfg_attr(target_os = "linux", allow(dead_code))]
pub struct NoopLabel;

impl ProcessLabel for NoopLabel {
    fn apply(&self, label: &str) -> Result<(), LabelError> {
        to_c_label(label).map(|_| ())
    }
}

/// Sets the kernel task name with `prctl(PR_SET_NAME)`.
///
/// The kernel keeps at most 15 bytes of the name.
#[cfg(target_os = "linux")]
pub struct PrctlLabel;

#[cfg(target_os = "linux")]
impl ProcessLabel for PrctlLabel {
    fn apply(&self, label: &str) -> Result<(), LabelError> {
        let name = to_c_label(label)?;
        nix::sys::prctl::set_name(&name).map_err(|errno| LabelError::Os {
            source: std::io::Error::from(errno),
        })
    }
}

/// The best labeler available on this platform.
pub fn platform_label() -> Box<dyn ProcessLabel> {
    #[cfg(target_os = "linux")]
    {
        Box::new(PrctlLabel)
    }
    #[cfg(not(target_os = "linux"))]
    {
        Box::new(NoopLabel)
    }
}
