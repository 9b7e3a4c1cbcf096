use super::ActorHandle;

/// Dialogue text surfaced by a tick, paired with the actor that owns it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogueEvent {
    pub text: String,
    pub speaker: ActorHandle,
}

/// Everything a tick produced for the dialogue layer. Contact events come
/// from collision probes, nearby events from trigger boxes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickEvents {
    pub contact: Vec<DialogueEvent>,
    pub nearby: Vec<DialogueEvent>,
}

impl TickEvents {
    pub fn is_empty(&self) -> bool {
        self.contact.is_empty() && self.nearby.is_empty()
    }
}
