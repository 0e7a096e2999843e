//! # Snapwire Shared
//! Schema registry, snapshot codec, entity filters, state machines and the
//! transport seam shared between snapwire-server & snapwire-client.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

pub use snapwire_serde::{ByteReader, ByteWriter, ConstByteLength, Serde, SerdeErr};

mod component;
mod filter;
mod messages;
mod role;
mod sim_clock;
mod snapshot;
mod state;
mod transport;
mod types;

pub use component::{
    component_kind::ComponentKind,
    component_kinds::{ComponentEntry, ComponentKinds},
    error::{ComponentError, SchemaError},
    fingerprint::{schema_fingerprint, FINGERPRINT_VERSION_TAG},
    replicate::Replicate,
};
pub use filter::{
    entity_filter::{EntityFilter, FilterDatumType, FilterStrength, RespectFilter},
    error::FilterError,
    ingredients::IngredientSet,
    target::FilterTarget,
};
pub use messages::{
    channel::{Channel, ChannelMode, ConnectionConfig},
    error::{ConfigError, MessageError},
    message_kind::MessageKind,
    net_message::{AnnouncementKind, NetMessage},
};
pub use role::{Role, RoleContext, RoleError};
pub use sim_clock::SimClock;
pub use snapshot::{
    archive::{SnapshotArchive, ARCHIVE_MAGIC, ARCHIVE_VERSION},
    codec::{DecodeReport, DecodedComponent, MutationPlan, SnapshotCodec},
    entity::{EntityHandle, EntityMut, EntityView},
    error::{SnapshotError, TransferError},
    record::{ComponentPayload, SnapshotRecord},
    transfer::{
        split_world, ChunkAssembler, WorldChunk, DEFAULT_CHUNK_SIZE, MAX_PENDING_TRANSFERS,
        MAX_WORLD_SIZE,
    },
};
pub use state::{
    error::StateError,
    game_state::{GameState, GameStateManager},
    menu_state::{MenuState, MenuStateManager},
    phases::{apply_host_phases, reset_on_connection_lost},
    state_manager::{StateManager, DEFAULT_HISTORY_LIMIT, HISTORY_WARN_THRESHOLD},
};
pub use transport::{
    link_conditioner::LinkConditionerConfig,
    local_hub::{LocalClientTransport, LocalHub, LocalHubConfig, LocalServerTransport},
    message_pool::MessagePool,
    ClientTransport, LinkStatus, PeerEvent, PrivateKey, RefusalReason, ServerTransport,
    TransportError, DEFAULT_PRIVATE_KEY,
};
pub use types::{PeerIndex, SessionId, Tick};
