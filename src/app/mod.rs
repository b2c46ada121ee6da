// Application layer - Use case interactors

pub mod container;
pub mod convert_interactor;
pub mod tools_interactor;

// Re-export interactors
pub use container::{AppContainer, DefaultAppContainer};
pub use convert_interactor::ConvertInteractor;
pub use tools_interactor::ToolsInteractor;
