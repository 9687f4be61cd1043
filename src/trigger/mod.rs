pub mod descriptor;
pub mod router;

pub use descriptor::{Binding, DESCRIPTOR_FILE, DescriptorError, FunctionDescriptor, resolve_trigger_kind};
pub use router::TriggerRouter;
