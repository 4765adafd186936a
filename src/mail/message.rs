use crate::ticketmaster::model::EventRecord;

/// Plain-text notification for a single event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub subject: String,
    pub body: String,
}

impl Notification {
    pub fn for_event(event: &EventRecord) -> Self {
        Self {
            subject: format!("New Concert: {}", event.name),
            body: format!(
                "🎤 **New Concert Alert!** 🎤\n\n\
                 **{}**\n\
                 📍 Venue: {}\n\
                 📅 Date: {}\n\
                 🔗 Tickets: {}",
                event.name, event.venue, event.date, event.url
            ),
        }
    }
}
