pub mod order_sequencer;

#[cfg(test)]
pub mod mocks;
