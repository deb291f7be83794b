use std::fs;
use std::path::{Path, PathBuf};

/// Files a daemon instance keeps in the data directory
pub struct DaemonControl {
    data_dir: PathBuf,
}

impl DaemonControl {
    #[must_use]
    pub fn new(data_dir: &Path) -> Self {
        Self {
            data_dir: data_dir.to_path_buf(),
        }
    }

    #[must_use]
    pub fn pid_path(&self) -> PathBuf {
        self.data_dir.join("smartlock.pid")
    }

    #[must_use]
    pub fn sock_path(&self) -> PathBuf {
        self.data_dir.join("smartlock.sock")
    }

    #[must_use]
    pub fn log_path(&self) -> PathBuf {
        self.data_dir.join("smartlock.log")
    }

    /// Get PID of running daemon
    ///
    /// # Errors
    ///
    /// Returns an error if the PID file exists but cannot be read or parsed
    pub fn get_pid(&self) -> anyhow::Result<Option<u32>> {
        let pid_path = self.pid_path();
        if !pid_path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(&pid_path)?;
        Ok(Some(contents.trim().parse::<u32>()?))
    }

    /// # Errors
    ///
    /// Returns an error if the data directory or PID file cannot be written
    pub fn write_pid(&self, pid: u32) -> anyhow::Result<()> {
        fs::create_dir_all(&self.data_dir)?;
        fs::write(self.pid_path(), pid.to_string())?;
        Ok(())
    }

    /// Remove PID file
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be removed
    pub fn remove_pid(&self) -> anyhow::Result<()> {
        let pid_path = self.pid_path();
        if pid_path.exists() {
            fs::remove_file(pid_path)?;
        }
        Ok(())
    }

    /// Remove a leftover socket file
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be removed
    pub fn remove_socket(&self) -> anyhow::Result<()> {
        let sock_path = self.sock_path();
        if sock_path.exists() {
            fs::remove_file(sock_path)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_pid_lifecycle() {
        let dir = tempdir().unwrap();
        let control = DaemonControl::new(&dir.path().join("smartlock"));

        assert_eq!(control.get_pid().unwrap(), None);
        control.write_pid(4242).unwrap();
        assert_eq!(control.get_pid().unwrap(), Some(4242));

        control.remove_pid().unwrap();
        assert_eq!(control.get_pid().unwrap(), None);
        control.remove_pid().unwrap();
    }

    #[test]
    fn test_corrupt_pid_file_is_error() {
        let dir = tempdir().unwrap();
        let control = DaemonControl::new(dir.path());
        fs::write(control.pid_path(), "not-a-pid").unwrap();
        assert!(control.get_pid().is_err());
    }

    #[test]
    fn test_paths_live_in_data_dir() {
        let control = DaemonControl::new(Path::new("/data/smartlock"));
        assert_eq!(control.sock_path(), Path::new("/data/smartlock/smartlock.sock"));
        assert_eq!(control.log_path(), Path::new("/data/smartlock/smartlock.log"));
    }
}
