//! # Admin set
//!
//! Admins verify campaigns, mark milestones complete and pause the protocol.
//! The set is bootstrapped by `init` and can never become empty.

use soroban_sdk::{Address, Env, Vec};

use crate::{events, storage, Error};

/// Store `admin` as the first member of the admin set.
pub fn init(env: &Env, admin: &Address) -> Result<(), Error> {
    if storage::has_admins(env) {
        return Err(Error::AlreadyInitialized);
    }
    let mut admins = Vec::new(env);
    admins.push_back(admin.clone());
    storage::set_admins(env, &admins);
    Ok(())
}

pub fn is_admin(env: &Env, address: &Address) -> bool {
    storage::get_admins(env).iter().any(|a| a == *address)
}

/// Fail with `NotInitialized` before `init`, `NotAuthorized` for non-admins.
pub fn require_admin(env: &Env, caller: &Address) -> Result<(), Error> {
    if !storage::has_admins(env) {
        return Err(Error::NotInitialized);
    }
    if !is_admin(env, caller) {
        return Err(Error::NotAuthorized);
    }
    Ok(())
}

pub fn add_admin(env: &Env, caller: &Address, new_admin: &Address) -> Result<(), Error> {
    caller.require_auth();
    require_admin(env, caller)?;

    let mut admins = storage::get_admins(env);
    if admins.iter().any(|a| a == *new_admin) {
        return Err(Error::AdminAlreadyExists);
    }
    admins.push_back(new_admin.clone());
    storage::set_admins(env, &admins);

    events::emit_admin_added(env, new_admin.clone(), caller.clone());
    Ok(())
}

pub fn remove_admin(env: &Env, caller: &Address, target: &Address) -> Result<(), Error> {
    caller.require_auth();
    require_admin(env, caller)?;

    let mut admins = storage::get_admins(env);
    let index = admins
        .iter()
        .position(|a| a == *target)
        .ok_or(Error::AdminNotFound)? as u32;
    if admins.len() == 1 {
        return Err(Error::LastAdmin);
    }
    admins.remove(index);
    storage::set_admins(env, &admins);

    events::emit_admin_removed(env, target.clone(), caller.clone());
    Ok(())
}
