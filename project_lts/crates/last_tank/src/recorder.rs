use chrono::NaiveDateTime;
use plugin_runtime::HostApi;

/// Replay file name for a match started at `started`: `lts-YYYYMMDD-HHMMSS.rec`.
pub fn replay_file_name(started: NaiveDateTime) -> String {
    started.format("lts-%Y%m%d-%H%M%S.rec").to_string()
}

/// Drives the host's server-side recording for one match at a time.
#[derive(Debug, Default)]
pub struct MatchRecorder {
    file_name: Option<String>,
}

impl MatchRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_recording(&self) -> bool {
        self.file_name.is_some()
    }

    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    /// Start buffering if recording is enabled. The file name is fixed now,
    /// from the host's local time.
    pub fn start(&mut self, host: &mut dyn HostApi, enabled: bool) {
        if !enabled {
            return;
        }
        if !host.start_recording() {
            tracing::warn!("host refused to start recording");
            return;
        }
        let name = replay_file_name(host.local_time());
        tracing::info!(file = %name, "match recording started");
        self.file_name = Some(name);
    }

    /// Save the buffer and stop. Announces the file name on success.
    pub fn finish(&mut self, host: &mut dyn HostApi) {
        let Some(name) = self.file_name.take() else {
            return;
        };
        match host.save_recording(&name) {
            Ok(path) => {
                tracing::info!(path = %path.display(), "match recording saved");
                host.broadcast(&format!("LTS replay saved as: {}", name));
            }
            Err(e) => tracing::warn!(file = %name, error = %e, "failed to save match recording"),
        }
        host.stop_recording();
    }
}
