//! A calculator session: parameters, derived projection, access gate and
//! address bar kept in step.

use thiserror::Error;
use tracing::{debug, info};
use url::Url;

use super::access::Access;
use super::address::{AddressBar, MemoryAddressBar, share_url, with_query};
use super::query::{merge_query, to_query};
use crate::projection::engine::project;
use crate::projection::params::{Edit, Field, ParameterSet, ViewMode};
use crate::projection::summary::Summary;
use crate::projection::types::Projection;

/// Errors from editing a session.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SessionError {
    #[error("view-only session: \"{field}\" cannot be edited")]
    Locked { field: Field },
    #[error("unknown field \"{0}\"")]
    UnknownField(String),
    #[error("invalid value \"{value}\" for \"{field}\"")]
    InvalidValue { field: Field, value: String },
}

/// Owns the parameter set and everything derived from it.
///
/// Every accepted edit recomputes the projection and summary synchronously
/// and replaces the address with the serialized parameters. Access is fixed
/// when the session opens.
pub struct Session<A: AddressBar = MemoryAddressBar> {
    params: ParameterSet,
    projection: Projection,
    summary: Summary,
    access: Access,
    address: A,
}

impl<A: AddressBar> Session<A> {
    /// Opens a session: merges the address query into `defaults`, decides
    /// access from its admin credential, then writes the address back.
    ///
    /// The rewritten address carries only parameter keys, so the credential
    /// does not survive past this call.
    ///
    /// # Arguments
    ///
    /// * `defaults` - Inputs used for every key the query lacks or garbles
    /// * `address` - Address bar holding the initial location
    /// * `admin_secret` - Value the `admin` key must equal to unlock editing
    pub fn open(defaults: ParameterSet, address: A, admin_secret: &str) -> Self {
        let query = address.current().query().unwrap_or("").to_string();
        let access = Access::from_query(&query, admin_secret);

        let mut params = defaults;
        let applied = merge_query(&mut params, &query);
        info!(applied, locked = access.is_locked(), "session opened");

        let projection = project(&params);
        let summary = Summary::from_projection(&params, &projection);
        let mut session = Self {
            params,
            projection,
            summary,
            access,
            address,
        };
        session.sync_address();
        session
    }

    /// Applies one field edit.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Locked`] when the session is view-only and the
    /// edit touches anything but the view mode.
    pub fn apply(&mut self, edit: Edit) -> Result<(), SessionError> {
        let field = edit.field();
        if !self.access.permits(field) {
            debug!(%field, "rejected edit on locked session");
            return Err(SessionError::Locked { field });
        }
        self.params.apply(edit);
        self.recompute();
        Ok(())
    }

    /// Parses `raw` for the field named by query `key` and applies it.
    ///
    /// # Errors
    ///
    /// Unknown keys, unparseable values and locked edits are reported.
    pub fn apply_query_value(&mut self, key: &str, raw: &str) -> Result<(), SessionError> {
        let field =
            Field::from_query_key(key).ok_or_else(|| SessionError::UnknownField(key.to_string()))?;
        if !self.access.permits(field) {
            return Err(SessionError::Locked { field });
        }
        let edit = Edit::parse(field, raw).ok_or_else(|| SessionError::InvalidValue {
            field,
            value: raw.to_string(),
        })?;
        self.apply(edit)
    }

    /// Moves `field` by `steps` of its increment (flips battery and view).
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Locked`] for a gated field.
    pub fn nudge(&mut self, field: Field, steps: i32) -> Result<(), SessionError> {
        match Edit::nudge(&self.params, field, steps) {
            Some(edit) => self.apply(edit),
            None => Ok(()),
        }
    }

    /// Switches between annual and cumulative views. Allowed in any access state.
    pub fn toggle_view(&mut self) {
        self.set_view(self.params.view.toggled());
    }

    /// Sets the view mode. Allowed in any access state.
    pub fn set_view(&mut self, view: ViewMode) {
        self.params.apply(Edit::View(view));
        self.recompute();
    }

    /// Current inputs.
    pub fn params(&self) -> &ParameterSet {
        &self.params
    }

    /// Projection of the current inputs.
    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    /// Summary of the current projection.
    pub fn summary(&self) -> &Summary {
        &self.summary
    }

    /// Access decided when the session opened.
    pub fn access(&self) -> Access {
        self.access
    }

    /// Whether edits other than the view mode are rejected.
    pub fn is_locked(&self) -> bool {
        self.access.is_locked()
    }

    /// The address bar the session writes to.
    pub fn address(&self) -> &A {
        &self.address
    }

    /// Current location.
    pub fn current_url(&self) -> &Url {
        self.address.current()
    }

    /// Location to share: the current one with any admin credential removed.
    pub fn share_link(&self) -> Url {
        share_url(self.address.current())
    }

    fn recompute(&mut self) {
        self.projection = project(&self.params);
        self.summary = Summary::from_projection(&self.params, &self.projection);
        self.sync_address();
    }

    fn sync_address(&mut self) {
        let query = to_query(&self.params);
        let next = with_query(self.address.current(), Some(&query));
        self.address.replace(next);
    }
}
