//! The application controller, owning the offer, the background image and the
//! generation state machine.
//!
//! The `Controller` is the only place these change. Views read snapshots
//! through [`Controller::offer`], [`Controller::background`] and
//! [`Controller::status`], and write through [`Controller::set_field`] and
//! [`Controller::request_generation`].
//!
//! # Generation
//!
//! A request runs the [`BackgroundGenerator`] on a worker thread and parks a
//! oneshot receiver here. [`Controller::poll`] is called once per frame; when
//! the result has arrived it settles the state machine:
//! - success replaces the background wholesale and moves to `Success`
//! - failure keeps the background and moves to `Error`
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use offerthumb::{AppConfig, Controller, GeminiGenerator, OfferData};
//!
//! let generator = GeminiGenerator::new(&AppConfig::from_env()).unwrap();
//! let mut controller = Controller::new(OfferData::seed(), Arc::new(generator));
//! controller.request_generation();
//! // ... later, once per frame:
//! controller.poll();
//! ```

use std::sync::Arc;

use futures::channel::oneshot;

use crate::error::GenerationError;
use crate::event::{AppEvent, EventBus, EventHandler};
use crate::image::ImageRef;
use crate::offer::{OfferData, OfferField};
use crate::services::BackgroundGenerator;
use crate::store::OfferStore;

use super::{GenerationMachine, GenerationStatus, RequestOutcome, SettleOutcome};

type GenerationResult = Result<ImageRef, GenerationError>;
type Waker = Arc<dyn Fn() + Send + Sync>;

pub struct Controller {
    store: OfferStore,
    machine: GenerationMachine,
    background: Option<ImageRef>,
    generator: Arc<dyn BackgroundGenerator>,
    pending: Option<oneshot::Receiver<GenerationResult>>,
    bus: Arc<EventBus>,
    /// Called from the worker thread once a result is ready.
    waker: Option<Waker>,
}

impl std::fmt::Debug for Controller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Controller")
            .field("offer", self.store.get())
            .field("status", self.machine.status())
            .field("background", &self.background.as_ref().map(|b| b.id()))
            .field("pending", &self.pending.is_some())
            .finish()
    }
}

impl Controller {
    pub fn new(offer: OfferData, generator: Arc<dyn BackgroundGenerator>) -> Self {
        let bus = Arc::new(EventBus::new());
        Self {
            store: OfferStore::new(offer, Arc::clone(&bus)),
            machine: GenerationMachine::new(),
            background: None,
            generator,
            pending: None,
            bus,
            waker: None,
        }
    }

    /// Registers a callback the worker invokes when its result is ready,
    /// typically `egui::Context::request_repaint`.
    pub fn set_waker(&mut self, waker: impl Fn() + Send + Sync + 'static) {
        self.waker = Some(Arc::new(waker));
    }

    pub fn offer(&self) -> &OfferData {
        self.store.get()
    }

    pub fn set_field(&mut self, field: OfferField, value: impl Into<String>) {
        self.store.set_field(field, value);
    }

    pub fn subscribe(&self, handler: Box<dyn EventHandler>) {
        self.bus.subscribe(handler);
    }

    pub fn bus(&self) -> &Arc<EventBus> {
        &self.bus
    }

    pub fn status(&self) -> &GenerationStatus {
        self.machine.status()
    }

    pub fn is_generating(&self) -> bool {
        self.machine.status().is_generating()
    }

    pub fn background(&self) -> Option<&ImageRef> {
        self.background.as_ref()
    }

    pub fn generator_label(&self) -> &str {
        self.generator.label()
    }

    /// Starts a generation for the current niche.
    ///
    /// Ignored while another request is in flight or when the niche is empty;
    /// the generator is not called in either case.
    pub fn request_generation(&mut self) -> RequestOutcome {
        let niche = self.store.get().niche.trim().to_owned();
        let (outcome, old) = self.machine.begin(&niche);
        match outcome {
            RequestOutcome::Started => {}
            RequestOutcome::IgnoredEmptyNiche => {
                log::debug!("Generation ignored: niche is empty");
                return outcome;
            }
            RequestOutcome::IgnoredInFlight => {
                log::warn!("Generation ignored: a request is already in flight");
                return outcome;
            }
        }
        if let Some(old) = old {
            self.announce_status(old);
        }

        let (tx, rx) = oneshot::channel();
        self.pending = Some(rx);

        let generator = Arc::clone(&self.generator);
        let waker = self.waker.clone();
        log::info!("Generating background for {:?}", niche);
        let spawned = std::thread::Builder::new()
            .name("background-generator".to_owned())
            .spawn(move || {
                let result = generator.generate(&niche);
                // The receiver is gone only if the controller was dropped.
                let _ = tx.send(result);
                if let Some(waker) = waker {
                    waker();
                }
            });

        if let Err(err) = spawned {
            log::error!("Failed to spawn generation worker: {}", err);
            self.pending = None;
            self.settle(Err(GenerationError::WorkerLost));
        }
        outcome
    }

    /// Applies a finished generation, if any. Returns `true` when the status
    /// changed during this call.
    pub fn poll(&mut self) -> bool {
        let Some(receiver) = self.pending.as_mut() else {
            return false;
        };
        let result = match receiver.try_recv() {
            Ok(Some(result)) => result,
            Ok(None) => return false,
            Err(oneshot::Canceled) => Err(GenerationError::WorkerLost),
        };
        self.pending = None;
        self.settle(result)
    }

    fn settle(&mut self, result: GenerationResult) -> bool {
        let old = self.machine.status().clone();
        if let Err(err) = &result {
            log::error!("Background generation failed: {}", err);
        }

        match self.machine.settle(result) {
            SettleOutcome::Succeeded(image) => {
                log::info!("Background generation succeeded");
                let image_id = image.id();
                self.background = Some(image);
                self.bus.emit(AppEvent::BackgroundReplaced { image_id });
            }
            SettleOutcome::Failed => {}
            SettleOutcome::Stale => {
                log::warn!("Dropping generation result: nothing was in flight");
                return false;
            }
        }
        self.announce_status(old);
        true
    }

    fn announce_status(&self, old: GenerationStatus) {
        self.bus.emit(AppEvent::StatusChanged {
            old,
            new: self.machine.status().clone(),
        });
    }
}
