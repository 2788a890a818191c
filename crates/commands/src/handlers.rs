//! One handler per data command. Each validates its fields, makes one or two
//! backend calls in a fixed order and returns a typed [`CommandResult`].

use {
    metamapa_backends::{
        Backends,
        types::{NewDeletionRequest, NewFact, NewPdi, StatusPatch},
    },
    tracing::warn,
};

use crate::{
    error::{CommandError, Result},
    registry::{CommandName, usage},
    result::{Absent, CommandResult, Outcome},
};

/// Status set on every new deletion request.
pub const PENDING_STATUS: &str = "pendiente";

fn missing(field: &str, command: CommandName) -> CommandError {
    CommandError::bad_usage(format!("Falta `{field}`. Usá `{}`", usage(command)))
}

fn require_all(fields: &[&str], command: CommandName) -> Result<()> {
    if fields.iter().any(|f| f.trim().is_empty()) {
        return Err(CommandError::bad_usage(format!("Usá `{}`", usage(command))));
    }
    Ok(())
}

pub async fn list_collection(backends: &Backends, name: &str) -> Result<CommandResult> {
    if name.is_empty() {
        return Err(missing("<nombre>", CommandName::ListCollection));
    }

    let facts = backends.aggregator.list_by_parent(name).await?;
    if facts.is_empty() {
        return Ok(CommandResult::Empty(Absent::Collection {
            name: name.to_string(),
        }));
    }

    Ok(CommandResult::Success(Outcome::FactList {
        collection: name.to_string(),
        facts,
    }))
}

/// Fetch a fact, then (optionally) its images. A failing image lookup
/// degrades to no images.
pub async fn show_fact(backends: &Backends, id: &str, fetch_images: bool) -> Result<CommandResult> {
    if id.is_empty() {
        return Err(missing("<id>", CommandName::ShowFact));
    }

    let Some(fact) = backends.aggregator.get_by_id(id).await? else {
        return Ok(CommandResult::Empty(Absent::Fact { id: id.to_string() }));
    };

    let images = if fetch_images {
        match backends.pdi.list_by_parent(id).await {
            Ok(images) => images,
            Err(e) => {
                warn!(fact_id = id, error = %e, "image lookup failed, showing fact without images");
                Vec::new()
            },
        }
    } else {
        Vec::new()
    };

    Ok(CommandResult::Success(Outcome::FactDetail {
        id: id.to_string(),
        fact,
        images,
    }))
}

pub async fn create_fact(
    backends: &Backends,
    collection: &str,
    title: &str,
    description: &str,
) -> Result<CommandResult> {
    require_all(&[collection, title], CommandName::CreateFact)?;

    let body = NewFact {
        nombre_coleccion: collection.to_string(),
        titulo: title.to_string(),
        descripcion: (!description.trim().is_empty()).then(|| description.to_string()),
    };
    let created = backends.sources.create(&body).await?;

    Ok(CommandResult::Success(Outcome::FactCreated {
        id: created.and_then(|c| c.id),
    }))
}

pub async fn attach_pdi(backends: &Backends, fact_id: &str, content: &str) -> Result<CommandResult> {
    require_all(&[fact_id, content], CommandName::AttachPdi)?;

    let body = NewPdi {
        hecho_id: fact_id.to_string(),
        contenido: content.to_string(),
    };
    let created = backends.sources.create_pdi(&body).await?;

    Ok(CommandResult::Success(Outcome::PdiCreated {
        id: created.and_then(|c| c.id),
        content: content.to_string(),
    }))
}

pub async fn request_deletion(
    backends: &Backends,
    fact_id: &str,
    reason: &str,
) -> Result<CommandResult> {
    require_all(&[fact_id, reason], CommandName::RequestDeletion)?;

    let body = NewDeletionRequest {
        hecho_id: fact_id.to_string(),
        motivo: reason.to_string(),
        estado: PENDING_STATUS.to_string(),
    };
    let created = backends.requests.create(&body).await?;
    let (id, status) = created.map_or((None, None), |c| (c.id, c.estado));

    Ok(CommandResult::Success(Outcome::DeletionRequested { id, status }))
}

/// The confirmation echoes the requested values whatever the backend answers.
pub async fn update_request(backends: &Backends, id: &str, status: &str) -> Result<CommandResult> {
    require_all(&[id, status], CommandName::UpdateRequest)?;

    let patch = StatusPatch {
        estado: status.to_string(),
    };
    backends.requests.patch(id, &patch).await?;

    Ok(CommandResult::Success(Outcome::RequestUpdated {
        id: id.to_string(),
        status: status.to_string(),
    }))
}
