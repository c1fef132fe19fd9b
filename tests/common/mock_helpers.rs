//! Fakes and mocks for render targets

use std::cell::RefCell;
use std::rc::Rc;
use streamscope::pipeline::{AppearanceProfile, RenderTarget};
use streamscope::Sample;

mockall::mock! {
    pub Target {}

    impl RenderTarget for Target {
        fn on_sample(&mut self, sample: &Sample);
        fn stop(&mut self);
        fn start(&mut self);
        fn apply_appearance(&mut self, profile: &AppearanceProfile);
    }
}

/// Something a render target was told to do
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceEvent {
    Sample(Sample),
    Stop,
    Start,
    Appearance(AppearanceProfile),
}

/// Render target that records every call, readable from the test through a
/// shared log.
#[derive(Debug, Clone, Default)]
pub struct RecordingTarget {
    log: Rc<RefCell<Vec<SurfaceEvent>>>,
}

impl RecordingTarget {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<SurfaceEvent> {
        self.log.borrow().clone()
    }

    pub fn samples(&self) -> Vec<Sample> {
        self.log
            .borrow()
            .iter()
            .filter_map(|e| match e {
                SurfaceEvent::Sample(s) => Some(*s),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, pred: impl Fn(&SurfaceEvent) -> bool) -> usize {
        self.log.borrow().iter().filter(|e| pred(e)).count()
    }

    pub fn last_appearance(&self) -> Option<AppearanceProfile> {
        self.log.borrow().iter().rev().find_map(|e| match e {
            SurfaceEvent::Appearance(p) => Some(*p),
            _ => None,
        })
    }
}

impl RenderTarget for RecordingTarget {
    fn on_sample(&mut self, sample: &Sample) {
        self.log.borrow_mut().push(SurfaceEvent::Sample(*sample));
    }

    fn stop(&mut self) {
        self.log.borrow_mut().push(SurfaceEvent::Stop);
    }

    fn start(&mut self) {
        self.log.borrow_mut().push(SurfaceEvent::Start);
    }

    fn apply_appearance(&mut self, profile: &AppearanceProfile) {
        self.log
            .borrow_mut()
            .push(SurfaceEvent::Appearance(*profile));
    }
}
