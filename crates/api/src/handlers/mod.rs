pub mod onboarding_wizard;
pub mod submissions;
