// ============================================================================
// Notifications
// ============================================================================
// Messages temporaires affichés en bas de l'écran.
// - Une notification avec une clé remplace la précédente de même clé
//   (ex: "trade" passe de "en cours" à "succès" sans se dupliquer)
// - Une notification "en cours" ne se ferme pas toute seule
// - Les autres disparaissent après NOTIFICATION_TTL
// ============================================================================

use chrono::{DateTime, Duration, Local};

use crate::config::NOTIFICATION_TTL;

/// Niveau d'une notification (détermine la couleur)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Pending,
    Info,
    Success,
    Error,
}

/// Une notification affichée
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub key: Option<&'static str>,
    pub level: Level,
    pub title: String,
    pub message: String,
    pub created_at: DateTime<Local>,
}

impl Notification {
    /// Vrai si la notification doit disparaître à `now`
    pub fn is_expired(&self, now: DateTime<Local>) -> bool {
        if self.level == Level::Pending {
            return false;
        }
        let ttl = Duration::milliseconds(NOTIFICATION_TTL.as_millis() as i64);
        now - self.created_at >= ttl
    }
}

/// Pile de notifications (la plus récente en dernier)
#[derive(Debug, Clone, Default)]
pub struct Notifications {
    items: Vec<Notification>,
}

impl Notifications {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ajoute une notification, ou met à jour celle qui a la même clé
    pub fn show(
        &mut self,
        key: Option<&'static str>,
        level: Level,
        title: impl Into<String>,
        message: impl Into<String>,
        now: DateTime<Local>,
    ) {
        let notification = Notification {
            key,
            level,
            title: title.into(),
            message: message.into(),
            created_at: now,
        };

        if key.is_some() {
            if let Some(existing) = self.items.iter_mut().find(|n| n.key == key) {
                *existing = notification;
                return;
            }
        }
        self.items.push(notification);
    }

    /// Retire les notifications expirées
    pub fn prune(&mut self, now: DateTime<Local>) {
        self.items.retain(|n| !n.is_expired(now));
    }

    pub fn dismiss_all(&mut self) {
        self.items.clear();
    }

    pub fn items(&self) -> &[Notification] {
        &self.items
    }

    pub fn latest(&self) -> Option<&Notification> {
        self.items.last()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyed_notification_is_updated_in_place() {
        let now = Local::now();
        let mut notifications = Notifications::new();
        notifications.show(Some("trade"), Level::Pending, "Achat de AAPL × 2", "", now);
        notifications.show(None, Level::Info, "Bienvenue", "", now);
        notifications.show(Some("trade"), Level::Success, "Achat réussi", "", now);

        assert_eq!(notifications.items().len(), 2);
        assert_eq!(notifications.items()[0].level, Level::Success);
        assert_eq!(notifications.items()[0].title, "Achat réussi");
    }

    #[test]
    fn test_notifications_expire_except_pending() {
        let now = Local::now();
        let mut notifications = Notifications::new();
        notifications.show(Some("trade"), Level::Pending, "En cours", "", now);
        notifications.show(None, Level::Error, "Erreur", "", now);

        notifications.prune(now + Duration::seconds(4));
        assert_eq!(notifications.items().len(), 2);

        notifications.prune(now + Duration::seconds(5));
        assert_eq!(notifications.items().len(), 1);
        assert_eq!(notifications.latest().map(|n| n.level), Some(Level::Pending));
    }
}
