mod defaults;
pub mod merge;
mod model;
pub mod session;
pub mod transfer;

pub use defaults::{
    default_branding_config, default_dark_palette, default_global_styling,
    default_light_palette, DEFAULT_APPLICATION_NAME, DEFAULT_LOGO_ICON,
};
pub use merge::{load_branding, merge_onto, MergeError, MergeResult};
pub use model::{
    BackgroundKind, BrandingConfig, DrawerOverlay, GlobalStyling, Gradient, LoginBackground,
    LogoType, ModePalette, SECTION_KEYS,
};
pub use session::{BrandingSession, LoadSource, SaveTicket, SessionError, SessionResult};
pub use transfer::{export_config, import_config, ImportPolicy, TransferError, TransferResult};
