use notifier_domain::RecipientId;
use std::collections::BTreeSet;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Supplies the users entitled to receive notifications and manages who is
/// allowed beyond the static administrators
pub trait IRecipientResolver: Send + Sync {
    /// The currently authorized recipients. Recomputed on every call so that
    /// revocations apply to all future deliveries.
    fn current_recipients(&self) -> Vec<RecipientId>;
    fn is_admin(&self, recipient: &RecipientId) -> bool;
    fn is_authorized(&self, recipient: &RecipientId) -> bool;
    /// Returns whether the recipient was not already allowed
    fn grant(&self, recipient: RecipientId) -> bool;
    /// Returns whether the recipient was allowed before. Administrators are
    /// never revoked.
    fn revoke(&self, recipient: &RecipientId) -> bool;
}

#[derive(Debug, Default)]
struct Recipients {
    admins: BTreeSet<RecipientId>,
    allowed: BTreeSet<RecipientId>,
}

/// Access control list of recipients: static administrators and allowed users
/// that can be granted and revoked at runtime.
#[derive(Debug, Default)]
pub struct RecipientRegistry {
    recipients: RwLock<Recipients>,
}

impl RecipientRegistry {
    pub fn new(admins: &[RecipientId], allowed: &[RecipientId]) -> Self {
        Self {
            recipients: RwLock::new(Recipients {
                admins: admins.iter().cloned().collect(),
                allowed: allowed.iter().cloned().collect(),
            }),
        }
    }

    // A panic while holding the lock cannot leave the sets half updated
    fn read(&self) -> RwLockReadGuard<'_, Recipients> {
        self.recipients
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Recipients> {
        self.recipients
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl IRecipientResolver for RecipientRegistry {
    fn current_recipients(&self) -> Vec<RecipientId> {
        let recipients = self.read();
        recipients
            .admins
            .union(&recipients.allowed)
            .cloned()
            .collect()
    }

    fn is_admin(&self, recipient: &RecipientId) -> bool {
        self.read().admins.contains(recipient)
    }

    fn is_authorized(&self, recipient: &RecipientId) -> bool {
        let recipients = self.read();
        recipients.admins.contains(recipient) || recipients.allowed.contains(recipient)
    }

    fn grant(&self, recipient: RecipientId) -> bool {
        self.write().allowed.insert(recipient)
    }

    fn revoke(&self, recipient: &RecipientId) -> bool {
        let mut recipients = self.write();
        !recipients.admins.contains(recipient) && recipients.allowed.remove(recipient)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(ids: &[&str]) -> Vec<RecipientId> {
        ids.iter().map(|id| RecipientId::new(*id)).collect()
    }

    #[test]
    fn current_recipients_is_union_of_admins_and_allowed() {
        let registry = RecipientRegistry::new(&ids(&["1", "2"]), &ids(&["2", "3"]));
        assert_eq!(registry.current_recipients(), ids(&["1", "2", "3"]));
    }

    #[test]
    fn granted_users_become_recipients() {
        let registry = RecipientRegistry::new(&ids(&["1"]), &[]);
        assert!(!registry.is_authorized(&RecipientId::new("7")));

        assert!(registry.grant(RecipientId::new("7")));
        assert!(!registry.grant(RecipientId::new("7")));
        assert_eq!(registry.current_recipients(), ids(&["1", "7"]));
        assert!(registry.is_authorized(&RecipientId::new("7")));
        assert!(!registry.is_admin(&RecipientId::new("7")));
    }

    #[test]
    fn revocation_applies_to_next_computation() {
        let registry = RecipientRegistry::new(&ids(&["1"]), &ids(&["5"]));
        assert_eq!(registry.current_recipients(), ids(&["1", "5"]));
        assert!(registry.revoke(&RecipientId::new("5")));
        assert!(!registry.revoke(&RecipientId::new("5")));
        assert_eq!(registry.current_recipients(), ids(&["1"]));
    }

    #[test]
    fn admins_cannot_be_revoked() {
        let registry = RecipientRegistry::new(&ids(&["1"]), &ids(&["1"]));
        assert!(!registry.revoke(&RecipientId::new("1")));
        assert!(registry.is_admin(&RecipientId::new("1")));
        assert_eq!(registry.current_recipients(), ids(&["1"]));
    }

    #[test]
    fn empty_registry_has_no_recipients() {
        let registry = RecipientRegistry::default();
        assert!(registry.current_recipients().is_empty());
    }
}
