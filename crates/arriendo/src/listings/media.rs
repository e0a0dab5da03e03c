use std::fmt::Debug;
use std::io::Cursor;

use google_drive3::{api::File, api::Scope, DriveHub};
use tokio::runtime::Runtime;

use super::domain::Listing;

/// A photo attached to a listing, as exposed by the file-storage
/// collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingMedia {
    pub file_id: String,
    pub name: String,
    pub mime_type: Option<String>,
    pub web_view_link: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    #[error("media operation failed: {0}")]
    Backend(String),
    #[error("media runtime unavailable: {0}")]
    Runtime(String),
    #[error("listing {listing_id} has no photo folder")]
    NoFolder { listing_id: String },
}

/// File-storage capability for listing photos. Adapters wrap whichever
/// vendor actually holds the files; the catalog only sees this trait.
pub trait MediaGateway: Debug {
    fn list_photos(&self, folder_id: &str) -> Result<Vec<ListingMedia>, MediaError>;
    fn upload_photo(
        &self,
        folder_id: &str,
        name: &str,
        content_type: mime::Mime,
        bytes: Vec<u8>,
    ) -> Result<String, MediaError>;
}

/// Photo workflows keyed off a listing's `photo_folder_id`. A listing
/// without a folder simply has no photos; uploads require one.
#[derive(Debug)]
pub struct ListingGallery {
    gateway: Box<dyn MediaGateway + Send + Sync>,
}

impl ListingGallery {
    pub fn new(gateway: Box<dyn MediaGateway + Send + Sync>) -> Self {
        Self { gateway }
    }

    pub fn photos_for(&self, listing: &Listing) -> Result<Vec<ListingMedia>, MediaError> {
        match listing.photo_folder_id.as_deref() {
            Some(folder_id) => self.gateway.list_photos(folder_id),
            None => Ok(Vec::new()),
        }
    }

    pub fn attach_photo(
        &self,
        listing: &Listing,
        name: &str,
        content_type: mime::Mime,
        bytes: Vec<u8>,
    ) -> Result<String, MediaError> {
        let folder_id =
            listing
                .photo_folder_id
                .as_deref()
                .ok_or_else(|| MediaError::NoFolder {
                    listing_id: listing.id.0.clone(),
                })?;
        self.gateway
            .upload_photo(folder_id, name, content_type, bytes)
    }
}

/// Thin wrapper around the generated google-drive3 client allowing the
/// synchronous catalog workflows to interact with Drive without exposing
/// async details.
pub struct DrivePhotoStore<C>
where
    C: google_drive3::common::Connector + Send + Sync + 'static,
{
    hub: DriveHub<C>,
    runtime: Runtime,
}

impl<C> DrivePhotoStore<C>
where
    C: google_drive3::common::Connector + Send + Sync + 'static,
{
    pub fn new(hub: DriveHub<C>, runtime: Runtime) -> Self {
        Self { hub, runtime }
    }

    pub fn with_runtime(hub: DriveHub<C>) -> Result<Self, MediaError> {
        let runtime = Runtime::new().map_err(|err| MediaError::Runtime(err.to_string()))?;
        Ok(Self::new(hub, runtime))
    }

    fn map_error<E: std::fmt::Display>(err: E) -> MediaError {
        MediaError::Backend(err.to_string())
    }
}

impl<C> std::fmt::Debug for DrivePhotoStore<C>
where
    C: google_drive3::common::Connector + Send + Sync + 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DrivePhotoStore").finish_non_exhaustive()
    }
}

impl<C> MediaGateway for DrivePhotoStore<C>
where
    C: google_drive3::common::Connector + Send + Sync + 'static,
{
    fn list_photos(&self, folder_id: &str) -> Result<Vec<ListingMedia>, MediaError> {
        let folder = folder_id.to_string();
        let result = self.runtime.block_on(async {
            self.hub
                .files()
                .list()
                .q(&format!(
                    "'{folder}' in parents and trashed=false and mimeType contains 'image/'"
                ))
                .param("fields", "files(id,name,mimeType,webViewLink)")
                .page_size(50)
                .include_items_from_all_drives(true)
                .supports_all_drives(true)
                .add_scope(Scope::Readonly)
                .doit()
                .await
        });

        let (_, file_list) = result.map_err(DrivePhotoStore::<C>::map_error)?;
        let files = file_list.files.unwrap_or_default();
        Ok(files
            .into_iter()
            .map(|file| ListingMedia {
                file_id: file.id.unwrap_or_default(),
                name: file.name.unwrap_or_else(|| "untitled".to_string()),
                mime_type: file.mime_type,
                web_view_link: file.web_view_link,
            })
            .collect())
    }

    fn upload_photo(
        &self,
        folder_id: &str,
        name: &str,
        content_type: mime::Mime,
        bytes: Vec<u8>,
    ) -> Result<String, MediaError> {
        let metadata = File {
            name: Some(name.to_string()),
            parents: Some(vec![folder_id.to_string()]),
            ..File::default()
        };

        let cursor = Cursor::new(bytes);
        let result = self.runtime.block_on(async {
            self.hub
                .files()
                .create(metadata)
                .param("fields", "id")
                .supports_all_drives(true)
                .add_scope(Scope::File)
                .upload(cursor, content_type)
                .await
        });

        let (_, file) = result.map_err(DrivePhotoStore::<C>::map_error)?;
        Ok(file.id.unwrap_or_default())
    }
}
