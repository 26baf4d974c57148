// Notice Sink Port
// Where per-firing outcomes surface (the UI layer's notice presentation)

use crate::domain::Notice;

pub trait NoticeSink: Send + Sync {
    fn notify(&self, notice: Notice);
}

pub mod mocks {
    use super::*;
    use std::sync::Mutex;

    /// Collects notices for assertions.
    #[derive(Default)]
    pub struct RecordingNoticeSink {
        notices: Mutex<Vec<Notice>>,
    }

    impl RecordingNoticeSink {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn notices(&self) -> Vec<Notice> {
            self.notices.lock().unwrap().clone()
        }
    }

    impl NoticeSink for RecordingNoticeSink {
        fn notify(&self, notice: Notice) {
            self.notices.lock().unwrap().push(notice);
        }
    }
}
