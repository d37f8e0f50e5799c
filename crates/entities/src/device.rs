//! Device-related entity definitions.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::User;

/// Maintenance interval assigned to newly created devices, in days.
const DEFAULT_MAINTENANCE_INTERVAL_DAYS: i64 = 90;

/// Reference period for cost amortization, in days.
const QUARTER_DAYS: f64 = 90.0;

const SECONDS_PER_DAY: i64 = 86_400;

/// Errors raised by validated device mutators.
#[derive(Debug, Error)]
pub enum DeviceError {
    /// A mutator was called with a value that violates a device invariant.
    /// The device is left unchanged.
    #[error("invalid {field}: {reason}")]
    InvalidArgument {
        field: &'static str,
        reason: String,
    },
}

impl DeviceError {
    /// Creates an invalid argument error.
    pub fn invalid_argument(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            field,
            reason: reason.into(),
        }
    }
}

/// A piece of equipment tracked by Gearbook.
///
/// Each device carries its own maintenance policy: a fixed interval in days,
/// a cost per maintenance event, and the derived next-due date. Fields with
/// invariants are private and mutated through validated methods; the rest are
/// edited in place by the presentation layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Device {
    /// Unique identifier, used as the storage key.
    pub device_id: i64,
    /// Display name, freely editable.
    pub device_name: String,
    /// Soft reference to the responsible [`User`]'s id. Never validated at
    /// write time; dangling references are tolerated.
    pub managed_by_user_id: String,
    /// `true` while the device is in service, `false` while in maintenance
    /// or otherwise inactive.
    pub is_active: bool,
    /// When this device was created. Set once.
    creation_date: DateTime<Utc>,
    /// When this device was last mutated through a setter.
    last_update: DateTime<Utc>,
    /// Days between scheduled maintenance events. Always >= 1.
    maintenance_interval: i64,
    /// Cost per maintenance event. Always >= 0.
    maintenance_cost: f64,
    /// Planned retirement date. Reserved, no operation reads it yet.
    pub end_of_life: Option<DateTime<Utc>>,
    /// First scheduled maintenance, computed once at creation.
    pub first_maintenance: DateTime<Utc>,
    /// Next scheduled maintenance. Recomputed when the interval changes or
    /// maintenance completes.
    pub next_maintenance: DateTime<Utc>,
    /// When maintenance last completed. `None` until the first completion.
    last_maintenance_date: Option<DateTime<Utc>>,
}

impl Device {
    /// Creates a new active device with the default maintenance policy.
    ///
    /// No validation is performed on the ids; duplicate or empty ids are
    /// the caller's concern.
    pub fn new(
        device_id: i64,
        device_name: impl Into<String>,
        managed_by_user_id: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        let first_maintenance = now + Duration::days(DEFAULT_MAINTENANCE_INTERVAL_DAYS);
        Self {
            device_id,
            device_name: device_name.into(),
            managed_by_user_id: managed_by_user_id.into(),
            is_active: true,
            creation_date: now,
            last_update: now,
            maintenance_interval: DEFAULT_MAINTENANCE_INTERVAL_DAYS,
            maintenance_cost: 0.0,
            end_of_life: None,
            first_maintenance,
            next_maintenance: first_maintenance,
            last_maintenance_date: None,
        }
    }

    /// When this device was created.
    pub fn creation_date(&self) -> DateTime<Utc> {
        self.creation_date
    }

    /// When this device was last mutated through a setter.
    pub fn last_update(&self) -> DateTime<Utc> {
        self.last_update
    }

    /// Days between scheduled maintenance events.
    pub fn maintenance_interval(&self) -> i64 {
        self.maintenance_interval
    }

    /// Cost per maintenance event.
    pub fn maintenance_cost(&self) -> f64 {
        self.maintenance_cost
    }

    /// When maintenance last completed, if ever.
    pub fn last_maintenance_date(&self) -> Option<DateTime<Utc>> {
        self.last_maintenance_date
    }

    /// Sets the maintenance interval and recomputes the next due date.
    ///
    /// The schedule anchors to the last completed maintenance when there is
    /// one, otherwise to the creation date. Fails without mutating anything
    /// if `days` is below one.
    pub fn set_maintenance_interval(&mut self, days: i64) -> Result<(), DeviceError> {
        if days < 1 {
            return Err(DeviceError::invalid_argument(
                "maintenance_interval",
                format!("must be at least 1 day, got {days}"),
            ));
        }
        self.maintenance_interval = days;
        let anchor = self.last_maintenance_date.unwrap_or(self.creation_date);
        self.next_maintenance = anchor + Duration::days(days);
        self.touch();
        Ok(())
    }

    /// Sets the cost per maintenance event.
    ///
    /// Fails without mutating anything if `cost` is negative.
    pub fn set_maintenance_cost(&mut self, cost: f64) -> Result<(), DeviceError> {
        if cost < 0.0 {
            return Err(DeviceError::invalid_argument(
                "maintenance_cost",
                format!("cannot be negative, got {cost}"),
            ));
        }
        self.maintenance_cost = cost;
        self.touch();
        Ok(())
    }

    /// Reassigns the responsible user.
    ///
    /// The id is taken as given; whether it resolves to a stored [`User`] is
    /// the caller's concern.
    pub fn set_managed_by_user_id(&mut self, user_id: impl Into<String>) {
        self.managed_by_user_id = user_id.into();
        self.touch();
    }

    /// Records a completed maintenance and reschedules the next one.
    ///
    /// The next due date anchors to the completion time, not to the
    /// previously scheduled date: completing late shifts the whole schedule
    /// later (floating cadence).
    pub fn complete_maintenance(&mut self) {
        let now = Utc::now();
        self.last_maintenance_date = Some(now);
        self.next_maintenance = now + Duration::days(self.maintenance_interval);
        self.last_update = now;
    }

    /// Whole days until the next scheduled maintenance. Negative once the
    /// device is overdue.
    pub fn days_until_maintenance(&self) -> i64 {
        let delta = self.next_maintenance - Utc::now();
        // Floor division: a device overdue by less than a day reads -1, not 0.
        delta.num_seconds().div_euclid(SECONDS_PER_DAY)
    }

    /// Maintenance cost amortized over a 90-day quarter.
    pub fn quarterly_maintenance_cost(&self) -> f64 {
        let maintenances_per_quarter = QUARTER_DAYS / self.maintenance_interval as f64;
        maintenances_per_quarter * self.maintenance_cost
    }

    /// Returns true when the responsible user id resolves against `users`.
    ///
    /// Read-only helper for the presentation layer; storing a device never
    /// performs this check.
    pub fn has_known_manager(&self, users: &[User]) -> bool {
        users.iter().any(|u| u.id == self.managed_by_user_id)
    }

    fn touch(&mut self) {
        self.last_update = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_creation_defaults() {
        let device = Device::new(1, "Laser Cutter", "one@example.edu");

        assert_eq!(device.device_id, 1);
        assert_eq!(device.device_name, "Laser Cutter");
        assert_eq!(device.managed_by_user_id, "one@example.edu");
        assert!(device.is_active);
        assert_eq!(device.maintenance_interval(), 90);
        assert_eq!(device.maintenance_cost(), 0.0);
        assert_eq!(device.last_maintenance_date(), None);
        assert_eq!(device.end_of_life, None);
        assert_eq!(
            device.first_maintenance,
            device.creation_date() + Duration::days(90)
        );
        assert_eq!(device.next_maintenance, device.first_maintenance);
    }

    #[test]
    fn test_set_maintenance_interval_recomputes_schedule() {
        let mut device = Device::new(1, "Laser Cutter", "one@example.edu");

        device.set_maintenance_interval(30).unwrap();

        assert_eq!(device.maintenance_interval(), 30);
        assert_eq!(
            device.next_maintenance,
            device.creation_date() + Duration::days(30)
        );
        assert!(device.last_update() >= device.creation_date());
    }

    #[test]
    fn test_set_maintenance_interval_rejects_below_one_day() {
        let mut device = Device::new(1, "Laser Cutter", "one@example.edu");
        let next_before = device.next_maintenance;
        let update_before = device.last_update();

        let result = device.set_maintenance_interval(0);

        assert!(matches!(
            result,
            Err(DeviceError::InvalidArgument { field, .. }) if field == "maintenance_interval"
        ));
        assert_eq!(device.maintenance_interval(), 90);
        assert_eq!(device.next_maintenance, next_before);
        assert_eq!(device.last_update(), update_before);
    }

    #[test]
    fn test_set_maintenance_interval_anchors_to_last_maintenance() {
        let mut device = Device::new(1, "Laser Cutter", "one@example.edu");

        device.complete_maintenance();
        device.set_maintenance_interval(10).unwrap();

        let last = device.last_maintenance_date().unwrap();
        assert_eq!(device.next_maintenance, last + Duration::days(10));
    }

    #[test]
    fn test_set_maintenance_cost() {
        let mut device = Device::new(1, "Laser Cutter", "one@example.edu");

        device.set_maintenance_cost(150.50).unwrap();
        assert_eq!(device.maintenance_cost(), 150.50);

        let result = device.set_maintenance_cost(-0.01);
        assert!(matches!(
            result,
            Err(DeviceError::InvalidArgument { field, .. }) if field == "maintenance_cost"
        ));
        assert_eq!(device.maintenance_cost(), 150.50);
    }

    #[test]
    fn test_complete_maintenance_floating_cadence() {
        let mut device = Device::new(1, "Laser Cutter", "one@example.edu");
        device.set_maintenance_interval(14).unwrap();

        device.complete_maintenance();

        let last = device.last_maintenance_date().expect("completion recorded");
        assert_eq!(device.next_maintenance, last + Duration::days(14));
        assert!(device.last_update() >= last);
    }

    #[test]
    fn test_days_until_maintenance_overdue_is_negative() {
        let mut device = Device::new(1, "Laser Cutter", "one@example.edu");
        device.next_maintenance = Utc::now() - Duration::days(3);

        assert!(device.days_until_maintenance() < 0);
    }

    #[test]
    fn test_days_until_maintenance_fresh_device() {
        let device = Device::new(1, "Laser Cutter", "one@example.edu");

        let days = device.days_until_maintenance();
        assert!((89..=90).contains(&days), "got {days}");
    }

    #[test]
    fn test_quarterly_maintenance_cost() {
        let mut device = Device::new(1, "Laser Cutter", "one@example.edu");

        device.set_maintenance_cost(150.50).unwrap();
        assert_eq!(device.quarterly_maintenance_cost(), 150.50);

        device.set_maintenance_interval(30).unwrap();
        device.set_maintenance_cost(100.0).unwrap();
        assert_eq!(device.quarterly_maintenance_cost(), 300.0);
    }

    #[test]
    fn test_set_managed_by_user_id_bumps_last_update() {
        let mut device = Device::new(1, "Laser Cutter", "one@example.edu");
        let before = device.last_update();

        device.set_managed_by_user_id("two@example.edu");

        assert_eq!(device.managed_by_user_id, "two@example.edu");
        assert!(device.last_update() >= before);
    }

    #[test]
    fn test_has_known_manager() {
        let users = vec![
            User::new("one@example.edu", "One"),
            User::new("two@example.edu", "Two"),
        ];
        let device = Device::new(1, "Laser Cutter", "one@example.edu");
        let orphan = Device::new(2, "3D Printer", "gone@example.edu");

        assert!(device.has_known_manager(&users));
        assert!(!orphan.has_known_manager(&users));
    }

    #[test]
    fn test_device_serializes_as_flat_record() {
        let device = Device::new(7, "Laser Cutter", "one@example.edu");

        let value = serde_json::to_value(&device).unwrap();
        assert_eq!(value["device_id"], 7);
        assert_eq!(value["device_name"], "Laser Cutter");
        assert_eq!(value["is_active"], true);
        // Private policy fields persist too; a reload keeps the full state.
        assert_eq!(value["maintenance_interval"], 90);
        assert!(value["creation_date"].is_string());
        assert!(value["last_maintenance_date"].is_null());
    }
}
