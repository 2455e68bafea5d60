// Command guards - checks that run before any command handler.
//
// The chain is evaluated in order and the first denial wins. The Discord
// layer builds a `CommandRequest` from the invocation and plugs the chain
// into the framework's command check.

use std::fmt;

/// Platform permissions the bot cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    Administrator,
    BanMembers,
    ModerateMembers,
    ManageGuild,
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Permission::Administrator => write!(f, "Administrator"),
            Permission::BanMembers => write!(f, "Ban Members"),
            Permission::ModerateMembers => write!(f, "Timeout Members"),
            Permission::ManageGuild => write!(f, "Manage Server"),
        }
    }
}

/// What the invoking member is allowed to do in the current guild.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActorPermissions {
    pub administrator: bool,
    pub ban_members: bool,
    pub moderate_members: bool,
    pub manage_guild: bool,
}

impl ActorPermissions {
    /// Administrators hold every permission.
    pub fn has(&self, permission: Permission) -> bool {
        if self.administrator {
            return true;
        }
        match permission {
            Permission::Administrator => false,
            Permission::BanMembers => self.ban_members,
            Permission::ModerateMembers => self.moderate_members,
            Permission::ManageGuild => self.manage_guild,
        }
    }
}

/// One command invocation as seen by the guards.
#[derive(Debug, Clone)]
pub struct CommandRequest<'a> {
    /// Qualified name, e.g. `"ban"` or `"points give"`.
    pub command: &'a str,
    pub in_guild: bool,
    pub permissions: ActorPermissions,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    Deny(String),
}

pub trait CommandGuard: Send + Sync {
    fn name(&self) -> &'static str;

    fn check(&self, request: &CommandRequest<'_>) -> GuardDecision;
}

/// Rejects anything invoked outside a guild.
pub struct GuildOnly;

impl CommandGuard for GuildOnly {
    fn name(&self) -> &'static str {
        "guild_only"
    }

    fn check(&self, request: &CommandRequest<'_>) -> GuardDecision {
        if request.in_guild {
            GuardDecision::Allow
        } else {
            GuardDecision::Deny("This command only works in servers.".to_string())
        }
    }
}

/// Maps command names (or a parent command and all its subcommands) to the
/// permission they need.
#[derive(Default)]
pub struct RequirePermission {
    rules: Vec<(String, Permission)>,
}

impl RequirePermission {
    pub fn new() -> Self {
        Self::default()
    }

    /// `command` matches itself and any subcommand below it.
    pub fn rule(mut self, command: &str, permission: Permission) -> Self {
        self.rules.push((command.to_string(), permission));
        self
    }

    fn matches(rule: &str, command: &str) -> bool {
        command == rule
            || command
                .strip_prefix(rule)
                .is_some_and(|rest| rest.starts_with(' '))
    }
}

impl CommandGuard for RequirePermission {
    fn name(&self) -> &'static str {
        "require_permission"
    }

    fn check(&self, request: &CommandRequest<'_>) -> GuardDecision {
        for (rule, permission) in &self.rules {
            if Self::matches(rule, request.command) && !request.permissions.has(*permission) {
                return GuardDecision::Deny(format!(
                    "You need the **{}** permission to use `/{}`.",
                    permission, request.command
                ));
            }
        }
        GuardDecision::Allow
    }
}

#[derive(Default)]
pub struct GuardChain {
    guards: Vec<Box<dyn CommandGuard>>,
}

impl GuardChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, guard: impl CommandGuard + 'static) -> Self {
        self.guards.push(Box::new(guard));
        self
    }

    /// The chain every command goes through.
    pub fn standard() -> Self {
        Self::new().with(GuildOnly).with(
            RequirePermission::new()
                .rule("ban", Permission::BanMembers)
                .rule("mute", Permission::ModerateMembers)
                .rule("settings", Permission::ManageGuild)
                .rule("roles", Permission::ManageGuild)
                .rule("dbhealth", Permission::ManageGuild)
                .rule("points give", Permission::ManageGuild)
                .rule("points remove", Permission::ManageGuild),
        )
    }

    pub fn evaluate(&self, request: &CommandRequest<'_>) -> GuardDecision {
        for guard in &self.guards {
            if let GuardDecision::Deny(reason) = guard.check(request) {
                tracing::debug!(
                    guard = guard.name(),
                    command = request.command,
                    %reason,
                    "Command denied"
                );
                return GuardDecision::Deny(reason);
            }
        }
        GuardDecision::Allow
    }
}
