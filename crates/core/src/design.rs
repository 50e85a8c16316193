//! The design aggregate and the blank-design factory.

use serde::{Deserialize, Serialize};

use crate::approval::ApprovalRecord;
use crate::canvas::{CanvasItem, DEFAULT_BACKGROUND_COLOR};
use crate::error::CoreError;
use crate::format::{validate_custom_dimension, DesignFormat};
use crate::scheduling::ScheduleInfo;
use crate::types::{time_based_id, EntityId, Timestamp};

/// Maximum number of items on a single design canvas.
pub const MAX_ITEMS_PER_DESIGN: usize = 500;

/// Which save/send/schedule action last touched a design. Audit breadcrumb only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SaveAction {
    SaveDraft,
    SaveToLibrary,
    SendForApproval,
    Schedule,
    Export,
}

/// One creative asset composed of canvas items.
///
/// Review and scheduling state live in [`ApprovalRecord`] and
/// [`ScheduleInfo`], which are read-only outside this crate: the approval
/// transition function is their only writer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Design {
    pub id: EntityId,
    #[serde(default)]
    pub name: Option<String>,
    pub brand_id: EntityId,
    #[serde(default)]
    pub campaign_id: Option<EntityId>,
    pub format: DesignFormat,
    pub width: u32,
    pub height: u32,
    pub background_color: String,
    pub items: Vec<CanvasItem>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    #[serde(default)]
    pub saved_to_library: bool,
    #[serde(default)]
    pub library_asset_id: Option<EntityId>,
    #[serde(flatten)]
    schedule: ScheduleInfo,
    #[serde(flatten)]
    approval: ApprovalRecord,
    #[serde(default)]
    pub last_save_action: Option<SaveAction>,
}

/// Create a blank design from a preset format.
///
/// The design holds exactly one solid white background item covering the
/// canvas at z-index 0 and starts in the `draft` review state.
pub fn create_initial_design(
    format: DesignFormat,
    brand_id: &str,
    campaign_id: Option<&str>,
) -> Result<Design, CoreError> {
    let (width, height) = format.dimensions();
    build_blank(format, width, height, brand_id, campaign_id)
}

/// Create a blank `custom` design with explicit dimensions.
pub fn create_custom_design(
    width: u32,
    height: u32,
    brand_id: &str,
    campaign_id: Option<&str>,
) -> Result<Design, CoreError> {
    validate_custom_dimension("width", width)?;
    validate_custom_dimension("height", height)?;
    build_blank(DesignFormat::Custom, width, height, brand_id, campaign_id)
}

fn build_blank(
    format: DesignFormat,
    width: u32,
    height: u32,
    brand_id: &str,
    campaign_id: Option<&str>,
) -> Result<Design, CoreError> {
    let brand_id = brand_id.trim();
    if brand_id.is_empty() {
        return Err(CoreError::Validation(
            "brand_id must not be empty".to_string(),
        ));
    }

    let now = chrono::Utc::now();
    let background =
        CanvasItem::solid_background(time_based_id("bg"), width, height, DEFAULT_BACKGROUND_COLOR);

    Ok(Design {
        id: time_based_id("design"),
        name: None,
        brand_id: brand_id.to_string(),
        campaign_id: campaign_id
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string),
        format,
        width,
        height,
        background_color: DEFAULT_BACKGROUND_COLOR.to_string(),
        items: vec![background],
        created_at: now,
        updated_at: now,
        saved_to_library: false,
        library_asset_id: None,
        schedule: ScheduleInfo::default(),
        approval: ApprovalRecord::default(),
        last_save_action: None,
    })
}

impl Design {
    pub fn approval(&self) -> &ApprovalRecord {
        &self.approval
    }

    pub fn schedule(&self) -> &ScheduleInfo {
        &self.schedule
    }

    pub(crate) fn approval_mut(&mut self) -> &mut ApprovalRecord {
        &mut self.approval
    }

    pub(crate) fn set_schedule(&mut self, schedule: ScheduleInfo) {
        self.schedule = schedule;
    }

    /// Replace review and scheduling state with that of `stored`.
    ///
    /// Used when an editor saves a full design document: whatever approval
    /// fields the client sent are discarded in favour of the stored ones.
    pub fn with_workflow_from(mut self, stored: &Design) -> Design {
        self.approval = stored.approval.clone();
        self.schedule = stored.schedule.clone();
        self
    }

    /// Items sorted by ascending z-index. Ties keep insertion order.
    pub fn items_in_paint_order(&self) -> Vec<&CanvasItem> {
        let mut items: Vec<&CanvasItem> = self.items.iter().collect();
        items.sort_by_key(|item| item.z_index);
        items
    }

    pub fn find_item(&self, item_id: &str) -> Option<&CanvasItem> {
        self.items.iter().find(|item| item.id == item_id)
    }

    pub(crate) fn find_item_mut(&mut self, item_id: &str) -> Option<&mut CanvasItem> {
        self.items.iter_mut().find(|item| item.id == item_id)
    }

    /// One above the highest z-index on the canvas.
    ///
    /// Fails when the topmost item already sits at `i32::MAX`.
    pub fn next_z_index(&self) -> Result<i32, CoreError> {
        match self.items.iter().map(|item| item.z_index).max() {
            None => Ok(0),
            Some(top) => top.checked_add(1).ok_or_else(|| {
                CoreError::Validation(format!(
                    "No z-index is left above {top}; lower the stacking order of existing items"
                ))
            }),
        }
    }

    /// Number of background items. A well-formed design has exactly one.
    pub fn background_count(&self) -> usize {
        self.items.iter().filter(|item| item.is_background()).count()
    }

    /// Record a save, stamping `updated_at`.
    ///
    /// `SaveToLibrary` requires the asset id the library assigned.
    pub fn record_save(
        &mut self,
        action: SaveAction,
        library_asset_id: Option<EntityId>,
        now: Timestamp,
    ) -> Result<(), CoreError> {
        if action == SaveAction::SaveToLibrary {
            let asset_id = library_asset_id
                .filter(|id| !id.trim().is_empty())
                .ok_or_else(|| {
                    CoreError::Validation(
                        "Saving to the library requires a library_asset_id".to_string(),
                    )
                })?;
            self.saved_to_library = true;
            self.library_asset_id = Some(asset_id);
        }
        self.last_save_action = Some(action);
        self.updated_at = now;
        Ok(())
    }

    /// Structural checks applied before a design is persisted.
    ///
    /// Preset formats pin the canvas size; only `custom` may choose its own.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.brand_id.trim().is_empty() {
            return Err(CoreError::Validation(
                "brand_id must not be empty".to_string(),
            ));
        }
        if self.format == DesignFormat::Custom {
            validate_custom_dimension("width", self.width)?;
            validate_custom_dimension("height", self.height)?;
        } else if (self.width, self.height) != self.format.dimensions() {
            let (width, height) = self.format.dimensions();
            return Err(CoreError::Validation(format!(
                "A {} design must be {width}x{height}, got {}x{}",
                self.format, self.width, self.height
            )));
        }
        if self.items.len() > MAX_ITEMS_PER_DESIGN {
            return Err(CoreError::Validation(format!(
                "Design has {} items, exceeding the maximum of {MAX_ITEMS_PER_DESIGN}",
                self.items.len()
            )));
        }
        let mut seen = std::collections::HashSet::new();
        for item in &self.items {
            if !seen.insert(item.id.as_str()) {
                return Err(CoreError::Validation(format!(
                    "Duplicate canvas item id '{}'",
                    item.id
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::approval::ApprovalStatus;
    use crate::canvas::{CanvasItemKind, ShapeType};

    #[test]
    fn blank_design_has_single_background() {
        for format in DesignFormat::ALL {
            let design = create_initial_design(format, "brand-1", None).unwrap();
            assert_eq!(design.items.len(), 1);
            assert_eq!(design.items[0].kind.type_name(), "background");
            assert_eq!(design.background_count(), 1);
            assert_eq!((design.width, design.height), format.dimensions());
        }
    }

    #[test]
    fn email_header_scenario() {
        let design = create_initial_design(DesignFormat::EmailHeader, "brand-1", None).unwrap();
        assert_eq!(design.width, 800);
        assert_eq!(design.height, 300);
        assert_eq!(design.background_color, "#ffffff");

        let bg = &design.items[0];
        assert_eq!(bg.z_index, 0);
        assert_eq!((bg.width, bg.height), (800.0, 300.0));
        assert_matches!(
            &bg.kind,
            CanvasItemKind::Background { background_color, .. } if background_color == "#ffffff"
        );
    }

    #[test]
    fn blank_design_metadata() {
        let design =
            create_initial_design(DesignFormat::SocialSquare, "brand-1", Some("camp-7")).unwrap();
        assert!(design.id.starts_with("design-"));
        assert_eq!(design.brand_id, "brand-1");
        assert_eq!(design.campaign_id.as_deref(), Some("camp-7"));
        assert_eq!(design.created_at, design.updated_at);
        assert!(!design.saved_to_library);
        assert_eq!(design.approval().status(), ApprovalStatus::Draft);
        assert!(!design.schedule().is_scheduled());
        assert_eq!(design.last_save_action, None);
    }

    #[test]
    fn ids_are_unique() {
        let a = create_initial_design(DesignFormat::Custom, "b", None).unwrap();
        let b = create_initial_design(DesignFormat::Custom, "b", None).unwrap();
        assert_ne!(a.id, b.id);
        assert_ne!(a.items[0].id, b.items[0].id);
    }

    #[test]
    fn empty_brand_rejected() {
        assert_matches!(
            create_initial_design(DesignFormat::SocialSquare, "  ", None),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn custom_design_uses_given_size() {
        let design = create_custom_design(640, 480, "brand-1", None).unwrap();
        assert_eq!(design.format, DesignFormat::Custom);
        assert_eq!((design.width, design.height), (640, 480));
        assert_eq!(design.items[0].width, 640.0);
        assert!(create_custom_design(0, 480, "brand-1", None).is_err());
    }

    #[test]
    fn paint_order_sorts_by_z_index() {
        let mut design = create_initial_design(DesignFormat::SocialSquare, "b", None).unwrap();
        let mut top = CanvasItem::shape("top", ShapeType::Circle, "#f00", 10.0, 10.0);
        top.z_index = 10;
        let mut middle = CanvasItem::text("middle", "hi", 0.0, 0.0);
        middle.z_index = 4;
        design.items.insert(0, top);
        design.items.push(middle);

        let order: Vec<&str> = design
            .items_in_paint_order()
            .iter()
            .map(|i| i.id.as_str())
            .collect();
        assert_eq!(order[1..], ["middle", "top"]);
        assert_eq!(design.next_z_index().unwrap(), 11);
    }

    #[test]
    fn json_round_trip_preserves_design() {
        let design = create_initial_design(DesignFormat::BlogFeatured, "brand-1", None).unwrap();
        let value = serde_json::to_value(&design).unwrap();

        assert_eq!(value["brandId"], "brand-1");
        assert_eq!(value["format"], "blog_featured");
        assert_eq!(value["approvalStatus"], "draft");
        assert_eq!(value["savedToLibrary"], false);
        assert!(value["createdAt"].is_string());

        let restored: Design = serde_json::from_value(value).unwrap();
        assert_eq!(restored, design);
    }

    #[test]
    fn record_save_to_library() {
        let mut design = create_initial_design(DesignFormat::SocialSquare, "b", None).unwrap();
        let now = chrono::Utc::now();
        assert!(design
            .record_save(SaveAction::SaveToLibrary, None, now)
            .is_err());

        design
            .record_save(SaveAction::SaveToLibrary, Some("asset-1".into()), now)
            .unwrap();
        assert!(design.saved_to_library);
        assert_eq!(design.library_asset_id.as_deref(), Some("asset-1"));
        assert_eq!(design.last_save_action, Some(SaveAction::SaveToLibrary));
        assert_eq!(design.updated_at, now);
    }

    #[test]
    fn with_workflow_from_discards_client_approval_fields() {
        let stored = create_initial_design(DesignFormat::SocialSquare, "b", None).unwrap();
        let mut value = serde_json::to_value(&stored).unwrap();
        value["approvalStatus"] = "approved".into();
        value["approvedBy"] = "sneaky".into();
        let incoming: Design = serde_json::from_value(value).unwrap();
        assert_eq!(incoming.approval().status(), ApprovalStatus::Approved);

        let merged = incoming.with_workflow_from(&stored);
        assert_eq!(merged.approval().status(), ApprovalStatus::Draft);
        assert_eq!(merged.approval().approved_by(), None);
    }

    #[test]
    fn validate_rejects_duplicate_item_ids() {
        let mut design = create_initial_design(DesignFormat::SocialSquare, "b", None).unwrap();
        let dup = design.items[0].clone();
        design.items.push(dup);
        assert_matches!(design.validate(), Err(CoreError::Validation(msg)) if msg.contains("Duplicate"));
    }

    #[test]
    fn next_z_index_fails_at_the_top_of_the_stack() {
        let mut design = create_initial_design(DesignFormat::SocialSquare, "b", None).unwrap();
        design.items[0].z_index = i32::MAX;
        assert_matches!(design.next_z_index(), Err(CoreError::Validation(_)));

        design.items.clear();
        assert_eq!(design.next_z_index().unwrap(), 0);
    }

    #[test]
    fn validate_rejects_preset_with_foreign_dimensions() {
        let mut design = create_initial_design(DesignFormat::SocialSquare, "b", None).unwrap();
        assert!(design.validate().is_ok());

        design.width = 5000;
        design.height = 7;
        assert_matches!(
            design.validate(),
            Err(CoreError::Validation(msg)) if msg.contains("5000x7")
        );
    }

    #[test]
    fn validate_bounds_custom_dimensions() {
        let mut design = create_custom_design(640, 480, "b", None).unwrap();
        design.width = 1920;
        design.height = 1080;
        assert!(design.validate().is_ok());

        design.height = 0;
        assert_matches!(design.validate(), Err(CoreError::Validation(_)));
        design.height = 10_001;
        assert_matches!(design.validate(), Err(CoreError::Validation(_)));
    }
}
