//! redb table definitions for the cooldown store.
//!
//! Two tables, one per [`fleetscale_core::CooldownKind`], both keyed by
//! app name with a JSON-encoded `CooldownRecord` value — mirroring the
//! KV collaborator's `last_scale_up`/`last_scale_down` hash namespaces.

use redb::TableDefinition;

pub const LAST_SCALE_UP: TableDefinition<&str, &[u8]> = TableDefinition::new("last_scale_up");
pub const LAST_SCALE_DOWN: TableDefinition<&str, &[u8]> = TableDefinition::new("last_scale_down");
