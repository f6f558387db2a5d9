use crossbeam_channel::{unbounded, Receiver, Sender};

use crate::{
    dom::Node,
    engine::{Decision, Engine},
    player::{PlayerCommand, PlayerInput, PlayerState},
    render,
    resource::{classify, Resource, ResourceSubtype, DEFAULT_LOCATION},
};

/// Events reported by the page watchers.
#[derive(Debug)]
pub enum Observation {
    /// An item was rendered into the stream feed.
    StreamItem(Node),
    /// A resource page, or one of the tracks listed on it, finished loading.
    HeroChanged(Node),
    /// The resource page was navigated away from.
    HeroClosed,
    /// The toggle button inside this element was clicked.
    Toggle(Node),
    /// The player badge now shows a different track.
    PlayerResourceChanged(Node),
    PlayerInput(PlayerInput),
    LocationChanged(String),
}

/// Ties the page watchers to the engine: every observed element is
/// classified, decided and rendered, and deleted tracks reaching the player
/// are skipped.
pub struct StreamCleaner {
    engine: Engine,
    player: PlayerState,
    location: String,
    hero_active: bool,
    sender: Sender<Observation>,
    receiver: Receiver<Observation>,
    commands: Sender<PlayerCommand>,
}

impl StreamCleaner {
    pub fn new(engine: Engine, commands: Sender<PlayerCommand>) -> Self {
        let (sender, receiver) = unbounded();
        Self {
            engine,
            player: PlayerState::new(),
            location: DEFAULT_LOCATION.to_owned(),
            hero_active: false,
            sender,
            receiver,
            commands,
        }
    }

    /// Queue for the page watchers. Observations hold page nodes, which are
    /// not `Send`, so the queue is fed and drained on the page's own thread.
    pub fn sender(&self) -> Sender<Observation> {
        self.sender.clone()
    }

    pub fn receiver(&self) -> Receiver<Observation> {
        self.receiver.clone()
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn player(&self) -> &PlayerState {
        &self.player
    }

    pub fn is_hero_active(&self) -> bool {
        self.hero_active
    }

    /// Handles everything queued so far without blocking.
    pub fn process_pending(&mut self) {
        let receiver = self.receiver();
        for event in receiver.try_iter() {
            self.handle(event);
        }
    }

    pub fn handle(&mut self, event: Observation) {
        match event {
            Observation::StreamItem(element) => {
                self.reconcile(&element);
            }
            Observation::HeroChanged(element) => {
                let resource = self.reconcile(&element);
                if resource.subtype() == Some(ResourceSubtype::Hero) {
                    self.hero_active = true;
                }
            }
            Observation::HeroClosed => {
                self.hero_active = false;
            }
            Observation::Toggle(element) => {
                let resource = self.classify(&element);
                let decision = self.engine.toggle(&resource);
                render::apply(&element, &resource, &decision);
            }
            Observation::PlayerResourceChanged(element) => {
                let resource = self.reconcile(&element);
                if self.engine.should_skip(&resource, self.hero_active) {
                    self.skip(&resource);
                }
            }
            Observation::PlayerInput(input) => {
                self.player.handle_input(input);
            }
            Observation::LocationChanged(location) => {
                self.location = location;
            }
        }
    }

    fn classify(&self, element: &Node) -> Resource {
        classify(Some(element), &self.location)
    }

    fn reconcile(&self, element: &Node) -> Resource {
        let resource = self.classify(element);
        let decision: Decision = self.engine.decide(&resource);
        render::apply(element, &resource, &decision);
        resource
    }

    fn skip(&self, resource: &Resource) {
        let command = self.player.skip();
        log::info!(
            "skipping deleted {:?} with {:?}",
            resource.identity_key(),
            command
        );
        if let Err(err) = self.commands.send(command) {
            log::error!("failed to send player command: {}", err);
        }
    }
}
