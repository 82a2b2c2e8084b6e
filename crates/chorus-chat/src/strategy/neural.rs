//! Placeholder for the neural bot. No model is trained or consulted.

pub const NEURAL_REPLY: &str = "Using neural networks to learn response patterns...";
