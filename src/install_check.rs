//! Checks whether exiftool is installed and explains how to get it.

use crate::error::ImageInfoError;
use std::path::Path;
use std::process::Command;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExiftoolStatus {
    Installed { version: String },
    Missing,
}

/// Install commands for one platform family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstallHint {
    pub platform: &'static str,
    pub steps: &'static [&'static str],
}

/// Runs `<executable> -ver` and returns the reported version.
pub fn exiftool_version(executable: &Path) -> Result<String, ImageInfoError> {
    let output = Command::new(executable).arg("-ver").output()?;
    if !output.status.success() {
        return Err(ImageInfoError::VersionQuery(
            String::from_utf8_lossy(&output.stderr).trim().to_string(),
        ));
    }

    let version = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if version.is_empty() {
        return Err(ImageInfoError::VersionQuery(
            "empty version output".to_string(),
        ));
    }
    Ok(version)
}

pub fn check_exiftool(executable: &Path) -> ExiftoolStatus {
    match exiftool_version(executable) {
        Ok(version) => ExiftoolStatus::Installed { version },
        Err(_) => ExiftoolStatus::Missing,
    }
}

/// Install instructions for an OS name as reported by `std::env::consts::OS`.
pub fn install_instructions(os: &str) -> Vec<InstallHint> {
    match os {
        "linux" => vec![
            InstallHint {
                platform: "Debian/Ubuntu",
                steps: &[
                    "sudo apt-get update",
                    "sudo apt-get install libimage-exiftool-perl",
                ],
            },
            InstallHint {
                platform: "Fedora/RHEL/CentOS",
                steps: &["sudo dnf install perl-Image-ExifTool"],
            },
        ],
        "macos" => vec![InstallHint {
            platform: "macOS (Homebrew)",
            steps: &["brew install exiftool"],
        }],
        "windows" => vec![InstallHint {
            platform: "Windows",
            steps: &[
                "Download the Windows executable from https://exiftool.org/",
                "Extract the .exe file and rename it to exiftool.exe",
                "Move it to a directory in your PATH or add its location to your PATH",
            ],
        }],
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_executable_is_reported_missing() {
        let status = check_exiftool(Path::new("/nonexistent/bin/exiftool"));
        assert_eq!(status, ExiftoolStatus::Missing);
    }

    #[test]
    fn test_version_query_errs_with_io_for_missing_executable() {
        let result = exiftool_version(Path::new("/nonexistent/bin/exiftool"));
        assert!(matches!(result, Err(ImageInfoError::Io(_))));
    }

    #[test]
    fn test_linux_has_apt_and_dnf_instructions() {
        let hints = install_instructions("linux");
        assert_eq!(hints.len(), 2);
        assert!(hints[0].steps.iter().any(|s| s.contains("apt-get install")));
        assert!(hints[1].steps.iter().any(|s| s.contains("dnf")));
    }

    #[test]
    fn test_unknown_os_has_no_instructions() {
        assert!(install_instructions("plan9").is_empty());
    }
}
