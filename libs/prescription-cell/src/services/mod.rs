pub mod composer;

pub use composer::PrescriptionComposerService;
