use bridge_traits::LifecycleSlot;
use serde::Serialize;

/// Lifecycle of the offline-cache coordinator.
///
/// ```text
/// uninitialized ──► unsupported
///       │
///       └──► registering ──► registered(slot)
///                  │
///                  └──► registration-failed
/// ```
///
/// The capability check is synchronous, so there is no stored state between
/// `uninitialized` and its two successors. `unsupported`, `registered` and
/// `registration-failed` are terminal for the life of the page.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "state", rename_all = "kebab-case")]
pub enum CoordinatorState {
    #[default]
    Uninitialized,
    /// The host has no background caching agent capability.
    Unsupported,
    /// Registration issued, waiting for the host to settle it.
    Registering,
    /// The host accepted the registration. `slot` is the first populated
    /// lifecycle slot at settlement time, if any.
    Registered {
        scope: String,
        slot: Option<LifecycleSlot>,
    },
    /// The host rejected the registration (or the bounded timeout expired).
    RegistrationFailed { reason: String },
}

impl CoordinatorState {
    /// Short label used in events and diagnostics.
    pub fn label(&self) -> String {
        match self {
            Self::Uninitialized => "uninitialized".to_string(),
            Self::Unsupported => "unsupported".to_string(),
            Self::Registering => "registering".to_string(),
            Self::Registered {
                slot: Some(slot), ..
            } => format!("registered({slot})"),
            Self::Registered { slot: None, .. } => "registered".to_string(),
            Self::RegistrationFailed { reason } => format!("registration-failed: {reason}"),
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Unsupported | Self::Registered { .. } | Self::RegistrationFailed { .. }
        )
    }

    /// Whether the coordinator is receiving control messages.
    pub fn is_listening(&self) -> bool {
        matches!(self, Self::Registered { .. })
    }
}
