//! View that records every call, for tests.

use std::sync::Mutex;

use crate::domain::{LightType, Submission};

use super::{ClientView, Notice, QueueRow};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
    Queue(Vec<QueueRow>),
    ApplicationForm,
    WaitingArea,
    Submission(Submission),
    LightType(LightType),
    Alert(Notice),
}

#[derive(Debug, Default)]
pub struct RecordingView {
    events: Mutex<Vec<ViewEvent>>,
}

impl RecordingView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ViewEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn alerts(&self) -> Vec<Notice> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                ViewEvent::Alert(notice) => Some(notice),
                _ => None,
            })
            .collect()
    }

    pub fn last_queue(&self) -> Option<Vec<QueueRow>> {
        self.events().into_iter().rev().find_map(|e| match e {
            ViewEvent::Queue(rows) => Some(rows),
            _ => None,
        })
    }

    pub fn count(&self, predicate: impl Fn(&ViewEvent) -> bool) -> usize {
        self.events().iter().filter(|e| predicate(e)).count()
    }

    fn push(&self, event: ViewEvent) {
        self.events.lock().unwrap().push(event);
    }
}

impl ClientView for RecordingView {
    fn render_queue(&self, rows: &[QueueRow]) {
        self.push(ViewEvent::Queue(rows.to_vec()));
    }

    fn show_application_form(&self) {
        self.push(ViewEvent::ApplicationForm);
    }

    fn show_waiting_area(&self) {
        self.push(ViewEvent::WaitingArea);
    }

    fn show_submission(&self, submission: &Submission) {
        self.push(ViewEvent::Submission(submission.clone()));
    }

    fn show_light_type(&self, light_type: &LightType) {
        self.push(ViewEvent::LightType(light_type.clone()));
    }

    fn alert(&self, notice: Notice) {
        self.push(ViewEvent::Alert(notice));
    }
}
