//! Profile editor for `/edit`.
//!
//! SYSTEM CONTEXT
//! ==============
//! Loads the session user's profile into a [`ProfileForm`], validates and
//! saves it back with `PUT /profile`, and uploads profile and cover photos.
//! A new photo is stored as an absolute URL and persisted right away with a
//! profile `PUT`; a failure of that follow-up write is only logged since the
//! next save carries the URL anyway.

#[cfg(test)]
#[path = "edit_test.rs"]
mod edit_test;

use tracing::{info, warn};

use crate::api::endpoints::absolute_asset_url;
use crate::error::ClientError;
use crate::models::PhotoKind;
use crate::routes::Route;
use crate::state::profile_form::ProfileForm;
use crate::state::{AppContext, ViewCell};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EditorStatus {
    pub loading: bool,
    /// Inline error shown above the form.
    pub error: Option<String>,
    pub uploading: Option<PhotoKind>,
}

pub struct ProfileEditor {
    ctx: AppContext,
    username: String,
    pub form: ViewCell<ProfileForm>,
    pub status: ViewCell<EditorStatus>,
}

impl ProfileEditor {
    /// # Errors
    ///
    /// Returns [`ClientError::MissingSession`] when nobody is logged in. A
    /// failed profile fetch is reported through [`EditorStatus::error`].
    pub async fn mount(ctx: &AppContext) -> Result<Self, ClientError> {
        let username = ctx.session.require()?;
        let editor = Self {
            ctx: ctx.clone(),
            username,
            form: ViewCell::default(),
            status: ViewCell::new(EditorStatus { loading: true, ..EditorStatus::default() }),
        };
        editor.load().await;
        Ok(editor)
    }

    pub async fn load(&self) {
        self.status.update(|s| s.loading = true);
        match self.ctx.backend.fetch_profile(&self.username).await {
            Ok(profile) => {
                self.form.update(|f| *f = ProfileForm::from_profile(profile));
                self.status.update(|s| s.error = None);
            }
            Err(e) => {
                warn!(error = %e, code = e.error_code(), username = %self.username, "profile load failed");
                self.status.update(|s| s.error = Some(e.to_string()));
            }
        }
        self.status.update(|s| s.loading = false);
    }

    /// Validate and save. On success the caller navigates to the returned
    /// route.
    ///
    /// # Errors
    ///
    /// Returns a validation error without issuing a request, or the backend
    /// error. Either way the message is also set on the status.
    pub async fn save(&self) -> Result<Route, ClientError> {
        let form = self.form.snapshot();
        if let Err(e) = form.validate() {
            self.status.update(|s| s.error = Some(e.to_string()));
            return Err(e.into());
        }
        if let Err(e) = self.ctx.backend.update_profile(&self.username, &form.to_profile()).await {
            warn!(error = %e, code = e.error_code(), username = %self.username, "profile save failed");
            self.status.update(|s| s.error = Some(e.to_string()));
            return Err(e);
        }
        info!(username = %self.username, "profile saved");
        self.status.update(|s| s.error = None);
        Ok(Route::Profile(None))
    }

    /// Upload a photo, store its absolute URL in the form and persist it.
    /// Returns the stored URL.
    ///
    /// # Errors
    ///
    /// Returns the upload error; the form is left unchanged.
    pub async fn upload_photo(&self, kind: PhotoKind, file_name: &str, bytes: Vec<u8>) -> Result<String, ClientError> {
        self.status.update(|s| s.uploading = Some(kind));
        let uploaded = self.ctx.backend.upload_photo(kind, file_name, bytes).await;
        self.status.update(|s| s.uploading = None);

        let file_url = match uploaded {
            Ok(url) => url,
            Err(e) => {
                warn!(error = %e, kind = kind.as_str(), "photo upload failed");
                self.status.update(|s| s.error = Some(format!("Failed to upload {} photo: {e}", kind.as_str())));
                return Err(e);
            }
        };
        let url = absolute_asset_url(self.ctx.backend.base_url(), &file_url);

        let form = self.form.update(|f| {
            match kind {
                PhotoKind::Profile => url.clone_into(&mut f.profile_photo),
                PhotoKind::Cover => url.clone_into(&mut f.cover_photo),
            }
            f.clone()
        });
        if let Some(form) = form {
            match self.ctx.backend.update_profile(&self.username, &form.to_profile()).await {
                Ok(()) => info!(kind = kind.as_str(), "photo persisted"),
                Err(e) => warn!(error = %e, kind = kind.as_str(), "photo uploaded but profile update failed"),
            }
        }
        Ok(url)
    }

    /// Upload a base64 data URL through the JSON endpoint and return the
    /// stored image URL.
    ///
    /// # Errors
    ///
    /// Returns the backend error.
    pub async fn upload_base64(&self, image: &str, kind: PhotoKind) -> Result<String, ClientError> {
        self.ctx.backend.upload_base64(image, kind).await.inspect_err(|e| {
            warn!(error = %e, kind = kind.as_str(), "base64 upload failed");
        })
    }

    pub fn unmount(&self) {
        self.form.close();
        self.status.close();
    }
}

impl Drop for ProfileEditor {
    fn drop(&mut self) {
        self.unmount();
    }
}
