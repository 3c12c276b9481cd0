//! Credential transitions that touch the client, storage, and store together.

use crate::app::api::ApiCtx;
use crate::app::preferences::{forget_credential, persist_credential};
use crate::core::auth::{Credential, SignOutReason};
use crate::core::store::{AppStore, clear_credential, init_credential, set_credential};
use tracing::info;
use yewdux::prelude::Dispatch;

/// Seed the client and store from storage before any view renders.
pub(crate) fn restore(api: &ApiCtx, stored: Option<Credential>) {
    api.client.set_credential(stored.clone());
    Dispatch::<AppStore>::new().reduce_mut(|store| init_credential(&mut store.auth, stored));
}

/// Install a fresh login. The client is updated first so the next page's
/// first tick is authenticated.
pub(crate) fn sign_in(api: &ApiCtx, credential: Credential) {
    info!(username = %credential.username, "signed in");
    api.client.set_credential(Some(credential.clone()));
    persist_credential(&credential);
    Dispatch::<AppStore>::new().reduce_mut(|store| set_credential(&mut store.auth, credential));
}

/// Drop the credential everywhere; routing then shows the login page.
pub(crate) fn sign_out(api: &ApiCtx, reason: SignOutReason) {
    api.client.set_credential(None);
    forget_credential();
    Dispatch::<AppStore>::new().reduce_mut(|store| {
        if clear_credential(&mut store.auth, reason) {
            info!(?reason, "signed out");
        }
    });
}
