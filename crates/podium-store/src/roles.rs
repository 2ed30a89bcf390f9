use indexmap::IndexSet;

use crate::{Error, Identity};

/// Role bookkeeping for a leaderboard registry.
///
/// There is exactly one owner at a time, and the owner is always a member of
/// the admin set. The owner cannot be removed from the admin set; the only
/// way for an owner to step down is to transfer ownership first.
#[derive(Debug, Clone)]
pub struct RoleRegistry {
    owner: Identity,
    admins: IndexSet<Identity>,
}

impl RoleRegistry {
    pub(crate) fn new(owner: Identity) -> crate::Result<Self> {
        if owner.is_zero() {
            return Err(Error::InvalidArgument("owner cannot be the zero identity"));
        }
        let mut admins = IndexSet::new();
        admins.insert(owner);
        Ok(Self { owner, admins })
    }

    /// Get the current owner.
    pub fn owner(&self) -> &Identity {
        &self.owner
    }

    /// Returns whether the identity is the current owner.
    pub fn is_owner(&self, identity: &Identity) -> bool {
        self.owner == *identity
    }

    /// Returns whether the identity holds the admin role.
    ///
    /// The owner is always an admin, so this also returns `true` for the
    /// owner.
    pub fn is_admin_or_owner(&self, identity: &Identity) -> bool {
        self.admins.contains(identity)
    }

    /// Returns all admins, owner included.
    pub fn admins(&self) -> impl Iterator<Item = &Identity> {
        self.admins.iter()
    }

    pub(crate) fn add_admin(&mut self, identity: Identity) -> crate::Result<()> {
        if !self.admins.insert(identity) {
            return Err(Error::AlreadyAdmin);
        }
        Ok(())
    }

    pub(crate) fn remove_admin(&mut self, identity: &Identity) -> crate::Result<()> {
        if self.is_owner(identity) {
            return Err(Error::CannotRemoveOwner);
        }
        if !self.admins.swap_remove(identity) {
            return Err(Error::NotAdmin);
        }
        Ok(())
    }

    /// Transfers ownership, granting admin to the new owner if it does not
    /// hold the role yet. Returns whether the role was newly granted.
    pub(crate) fn transfer_ownership(&mut self, new_owner: Identity) -> crate::Result<bool> {
        if new_owner.is_zero() {
            return Err(Error::InvalidArgument(
                "new owner cannot be the zero identity",
            ));
        }
        let granted = self.admins.insert(new_owner);
        self.owner = new_owner;
        Ok(granted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(byte: u8) -> Identity {
        Identity::new([byte; 32])
    }

    #[test]
    fn owner_is_always_an_admin() {
        let owner = identity(1);
        let roles = RoleRegistry::new(owner).unwrap();
        assert!(roles.is_owner(&owner));
        assert!(roles.is_admin_or_owner(&owner));
        assert_eq!(roles.admins().collect::<Vec<_>>(), vec![&owner]);
    }

    #[test]
    fn zero_owner_is_rejected() {
        assert_eq!(
            RoleRegistry::new(Identity::ZERO).unwrap_err(),
            Error::InvalidArgument("owner cannot be the zero identity"),
        );
    }

    #[test]
    fn add_admin_rejects_duplicates() {
        let mut roles = RoleRegistry::new(identity(1)).unwrap();
        roles.add_admin(identity(2)).unwrap();
        assert_eq!(roles.add_admin(identity(2)).unwrap_err(), Error::AlreadyAdmin);
        assert_eq!(roles.add_admin(identity(1)).unwrap_err(), Error::AlreadyAdmin);
    }

    #[test]
    fn remove_admin_protects_the_owner() {
        let owner = identity(1);
        let mut roles = RoleRegistry::new(owner).unwrap();
        roles.add_admin(identity(2)).unwrap();
        assert_eq!(
            roles.remove_admin(&owner).unwrap_err(),
            Error::CannotRemoveOwner
        );
        roles.remove_admin(&identity(2)).unwrap();
        assert_eq!(roles.remove_admin(&identity(2)).unwrap_err(), Error::NotAdmin);
    }

    #[test]
    fn transfer_grants_admin_to_the_new_owner() {
        let old = identity(1);
        let new = identity(2);
        let mut roles = RoleRegistry::new(old).unwrap();
        assert!(roles.transfer_ownership(new).unwrap());
        assert!(roles.is_owner(&new));
        assert!(roles.is_admin_or_owner(&new));
        // The previous owner keeps its admin role.
        assert!(roles.is_admin_or_owner(&old));
        assert!(!roles.is_owner(&old));
    }

    #[test]
    fn transfer_to_an_existing_admin_grants_nothing() {
        let mut roles = RoleRegistry::new(identity(1)).unwrap();
        roles.add_admin(identity(2)).unwrap();
        assert!(!roles.transfer_ownership(identity(2)).unwrap());
    }

    #[test]
    fn transfer_to_zero_is_rejected() {
        let mut roles = RoleRegistry::new(identity(1)).unwrap();
        assert_eq!(
            roles.transfer_ownership(Identity::ZERO).unwrap_err(),
            Error::InvalidArgument("new owner cannot be the zero identity"),
        );
        assert!(roles.is_owner(&identity(1)));
    }
}
