//! Maintenance schedule views over device collections.
//!
//! Pure in-memory filtering and sorting for the maintenance plan display;
//! nothing here touches storage.

use crate::Device;

/// Devices currently flagged inactive / in maintenance.
pub fn in_maintenance(devices: &[Device]) -> Vec<&Device> {
    devices.iter().filter(|d| !d.is_active).collect()
}

/// Active devices ordered by urgency: overdue first, then by how soon
/// maintenance is due. Inactive devices are not scheduled.
pub fn upcoming_maintenance(devices: &[Device]) -> Vec<&Device> {
    let mut upcoming: Vec<&Device> = devices.iter().filter(|d| d.is_active).collect();
    upcoming.sort_by_key(|d| d.days_until_maintenance());
    upcoming
}
