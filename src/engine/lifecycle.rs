use crate::models::BookingStatus;
use crate::utils::error::AppError;

/// Events that can be applied to a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingEvent {
    Confirm,
    Cancel,
    /// End time passed with no dispute.
    Elapse,
    Dispute,
}

/// Side effect attached to a legal transition. The orchestrator applies it
/// together with the status write; every effect is idempotent so a replay
/// during recovery never applies it twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SideEffect {
    MintTicket,
    ReleaseSlot,
    ReleaseSlotAndVoidTicket,
    AwardLoyaltyPoints,
    FreezeTicket,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub to: BookingStatus,
    pub effect: SideEffect,
}

/// The booking state machine. Pure and deterministic; this is the only place
/// that decides a status change, and an illegal event leaves state untouched
/// by never producing a transition at all.
pub fn transition(from: BookingStatus, event: BookingEvent) -> Result<Transition, AppError> {
    use BookingEvent::*;
    use BookingStatus::*;

    let transition = match (from, event) {
        (Pending, Confirm) => Transition {
            to: Confirmed,
            effect: SideEffect::MintTicket,
        },
        (Pending, Cancel) => Transition {
            to: Cancelled,
            effect: SideEffect::ReleaseSlot,
        },
        (Confirmed, Cancel) => Transition {
            to: Cancelled,
            effect: SideEffect::ReleaseSlotAndVoidTicket,
        },
        (Confirmed, Elapse) => Transition {
            to: Completed,
            effect: SideEffect::AwardLoyaltyPoints,
        },
        (Confirmed, Dispute) => Transition {
            to: Disputed,
            effect: SideEffect::FreezeTicket,
        },
        (from, event) => {
            return Err(AppError::InvalidTransition(format!(
                "cannot apply {:?} to a booking in {}",
                event,
                from.as_str()
            )))
        }
    };
    Ok(transition)
}
