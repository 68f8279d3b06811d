use std::fs;
use std::path::Path;

use crate::error::{BillingError, Result};

/// Write downloaded PDF bytes to disk. The backend occasionally answers a
/// PDF request with an HTML error page behind a 200, so the header magic is
/// checked before anything touches the filesystem.
pub fn save_pdf(bytes: &[u8], path: &Path) -> Result<()> {
    if !bytes.starts_with(b"%PDF") {
        return Err(BillingError::PdfDownload(
            "server did not return a PDF document".to_string(),
        ));
    }

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, bytes)?;

    Ok(())
}

/// Open a file with the system default viewer.
pub fn open_path(pdf_path: &Path) -> Result<()> {
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open").arg(pdf_path).spawn()?;
    }

    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open").arg(pdf_path).spawn()?;
    }

    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/C", "start", "", pdf_path.to_str().unwrap_or("")])
            .spawn()?;
    }

    Ok(())
}
