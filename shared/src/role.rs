use std::fmt;

use thiserror::Error;

/// Which execution context a piece of code is running in
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Role {
    ClientMain,
    Server,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::ClientMain => write!(f, "client"),
            Role::Server => write!(f, "server"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoleError {
    /// An authoritative-only operation was attempted from a non-server context
    #[error("`{operation}` is authoritative and may only run in the server context, but was called from the {role} context")]
    NotAuthoritative { operation: &'static str, role: Role },
}

/// Capability marker handed by reference to code that must know whether it
/// runs on the authoritative simulation. Each adapter owns exactly one.
#[derive(Debug, PartialEq, Eq)]
pub struct RoleContext {
    role: Role,
}

impl RoleContext {
    pub fn server() -> Self {
        Self { role: Role::Server }
    }

    pub fn client_main() -> Self {
        Self {
            role: Role::ClientMain,
        }
    }

    pub fn current_role(&self) -> Role {
        self.role
    }

    pub fn is_server(&self) -> bool {
        self.role == Role::Server
    }

    pub fn require_server(&self, operation: &'static str) -> Result<(), RoleError> {
        if self.is_server() {
            Ok(())
        } else {
            Err(RoleError::NotAuthoritative {
                operation,
                role: self.role,
            })
        }
    }
}
