pub(crate) mod message;

pub(crate) use message::Message as MessageRecord;
