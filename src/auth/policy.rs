//! Role-based access policy.
//!
//! Every decision is a pure predicate over the caller's (role, outlet, user)
//! triple; handlers consult these before touching the store, and a denial
//! leaves no state change behind.

use uuid::Uuid;

use crate::models::{leave, user, LeaveStatus, UserRole};

/// Visibility scope for collection listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Admin: every record.
    All,
    /// Manager: records of one outlet.
    Outlet(Uuid),
    /// Employee: only records owned by this user.
    SelfOnly(Uuid),
}

/// The caller's identity triple.
#[derive(Debug, Clone, Copy)]
pub struct Actor {
    pub user_id: Uuid,
    pub role: UserRole,
    pub outlet_id: Option<Uuid>,
}

impl Actor {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    /// Scope applied when listing leaves. A manager without an outlet
    /// assignment collapses to self-only.
    pub fn leave_scope(&self) -> Scope {
        match (self.role, self.outlet_id) {
            (UserRole::Admin, _) => Scope::All,
            (UserRole::Manager, Some(outlet)) => Scope::Outlet(outlet),
            _ => Scope::SelfOnly(self.user_id),
        }
    }

    /// Scope applied when listing users and balances.
    pub fn user_scope(&self) -> Scope {
        self.leave_scope()
    }

    pub fn can_view_leave(&self, leave: &leave::Model) -> bool {
        match self.leave_scope() {
            Scope::All => true,
            Scope::Outlet(outlet) => leave.outlet_id == outlet,
            Scope::SelfOnly(user_id) => leave.employee_id == user_id,
        }
    }

    /// Submitting on behalf of someone else is an admin privilege.
    pub fn can_submit_for(&self, employee_id: Uuid) -> bool {
        self.is_admin() || self.user_id == employee_id
    }

    /// Managers decide within their own outlet; admins everywhere;
    /// employees never.
    pub fn can_decide_leave(&self, leave: &leave::Model) -> bool {
        match self.role {
            UserRole::Admin => true,
            UserRole::Manager => self.outlet_id == Some(leave.outlet_id),
            UserRole::Employee => false,
        }
    }

    /// An employee may withdraw an own request while it is still pending;
    /// admins may remove any record.
    pub fn can_cancel_leave(&self, leave: &leave::Model) -> bool {
        self.is_admin()
            || (leave.employee_id == self.user_id && leave.status == LeaveStatus::Pending)
    }

    pub fn can_view_user(&self, user: &user::Model) -> bool {
        match self.user_scope() {
            Scope::All => true,
            Scope::Outlet(outlet) => user.outlet_id == Some(outlet) || user.id == self.user_id,
            Scope::SelfOnly(user_id) => user.id == user_id,
        }
    }

    pub fn can_view_balance_of(&self, owner: &user::Model) -> bool {
        self.can_view_user(owner)
    }

    pub fn can_manage_outlets(&self) -> bool {
        self.is_admin()
    }

    pub fn can_manage_users(&self) -> bool {
        self.is_admin()
    }

    pub fn can_allocate_balance(&self) -> bool {
        self.is_admin()
    }

    pub fn can_review_signups(&self) -> bool {
        self.is_admin()
    }

    /// Dashboard counters span all outlets; plain employees have no use
    /// for them.
    pub fn can_view_stats(&self) -> bool {
        self.role != UserRole::Employee
    }
}
