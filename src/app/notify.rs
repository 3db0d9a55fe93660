/// User-facing notifications. The desktop shell shows these as
/// toasts; the headless default writes them to the log.
pub trait Notifier: Send + Sync {
    fn error(&self, message: &str);

    fn info(&self, message: &str);
}

#[derive(Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn error(&self, message: &str) {
        log::error!("{}", message);
    }

    fn info(&self, message: &str) {
        log::info!("{}", message);
    }
}

#[cfg(test)]
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    pub errors: std::sync::Mutex<Vec<String>>,
    pub infos: std::sync::Mutex<Vec<String>>,
}

#[cfg(test)]
impl Notifier for RecordingNotifier {
    fn error(&self, message: &str) {
        self.errors.lock().unwrap().push(message.to_string());
    }

    fn info(&self, message: &str) {
        self.infos.lock().unwrap().push(message.to_string());
    }
}
