//! Packwiz pack records, command dispatch and the reconciling pack mirror

pub mod devpack;
pub mod index_file;
pub mod meta_file;
pub mod pack;
pub mod pack_file;
pub mod packwiz;
pub mod records;

pub use devpack::{DevInstance, DevpackError};
pub use index_file::{IndexEntry, IndexFile};
pub use meta_file::{METAFILE_EXTENSION, MetaFile, Side, slug};
pub use pack::{Pack, PackError, ReconcileReport};
pub use pack_file::{ModLoader, PACK_FILE_NAME, PackFile, PackVersions};
pub use packwiz::{
    AddRequest, CurseForgeAddOptions, CurseForgeExportOptions, ExportRequest, ExportSide,
    ExportTarget, InitOptions, ModrinthAddOptions, ModrinthExportOptions, Packwiz, PackwizCommand,
    PackwizError,
};
pub use records::RecordError;
