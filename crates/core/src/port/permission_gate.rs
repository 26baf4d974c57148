// Send Permission Gate Port

/// Authorization gate checked before every delivery.
///
/// When the gate denies, the firing is skipped and a "permission required"
/// notice is surfaced instead of calling the transport.
pub trait PermissionGate: Send + Sync {
    fn has_send_permission(&self) -> bool;
}

/// Statically configured gate (production).
///
/// The granted flag comes from configuration; composing applications that
/// have no permission concept construct it granted.
pub struct StaticPermissionGate {
    granted: bool,
}

impl StaticPermissionGate {
    pub fn new(granted: bool) -> Self {
        Self { granted }
    }

    pub fn granted() -> Self {
        Self::new(true)
    }

    pub fn denied() -> Self {
        Self::new(false)
    }
}

impl PermissionGate for StaticPermissionGate {
    fn has_send_permission(&self) -> bool {
        self.granted
    }
}
