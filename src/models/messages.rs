use serde::{Deserialize, Serialize};

use crate::models::{CursorPosition, PresenceEntry, SessionEvent};

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CursorMessage {
    pub cursor: CursorPosition,
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct PingMessage {}

/// Client acknowledgment of an event; received but never awaited
#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct AckMessage {
    pub event_id: String,
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(tag = "type")]
pub enum ReceivedMessage {
    #[serde(rename = "cursor")]
    Cursor(CursorMessage),
    #[serde(rename = "ping")]
    Ping(PingMessage),
    #[serde(rename = "ack")]
    Ack(AckMessage),
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PresenceMessage {
    pub entries: Vec<PresenceEntry>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PongMessage {
    pub date: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(tag = "type")]
pub enum SendMessage {
    #[serde(rename = "presence")]
    Presence(PresenceMessage),
    #[serde(rename = "event")]
    Event(SessionEvent),
    #[serde(rename = "pong")]
    Pong(PongMessage),
}
