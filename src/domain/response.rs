use crate::domain::value::Carrier;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendReport {
    pub carrier: Carrier,
    /// Recipients as written into the send form.
    pub recipients: Vec<String>,
    pub parts: usize,
}
