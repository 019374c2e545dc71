use rand::RngCore;

/// Number of random bytes behind a ticket code (two hex characters each).
pub const TICKET_BYTES: usize = 4;

/// Issues admission ticket codes for new reservations.
pub trait TicketIssuer: Send + Sync {
    fn issue(&self) -> String;
}

/// Eight uppercase hex characters drawn from the thread RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomTickets;

impl TicketIssuer for RandomTickets {
    fn issue(&self) -> String {
        let mut bytes = [0u8; TICKET_BYTES];
        rand::thread_rng().fill_bytes(&mut bytes);
        encode_ticket(&bytes)
    }
}

pub fn encode_ticket(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02X}")).collect()
}
