use crate::types::Role;

/// Roles implicitly held by a role, one level down the hierarchy
pub fn sub_roles(role: Role) -> &'static [Role] {
    match role {
        Role::SuperAdmin => &[
            Role::Admin,
            Role::User,
            Role::SpaceProvider,
            Role::Guest,
            Role::SpaceBroker,
        ],
        Role::Admin => &[Role::User, Role::SpaceProvider, Role::SpaceBroker, Role::Guest],
        Role::User | Role::SpaceProvider | Role::SpaceBroker | Role::Guest => &[],
    }
}

/// True if any held role, or any role it implies, is in `allowed`.
pub fn has_access(held: &[Role], allowed: &[Role]) -> bool {
    held.iter().any(|role| {
        allowed.contains(role) || sub_roles(*role).iter().any(|sub| allowed.contains(sub))
    })
}
