use std::fmt;

use serde::Serialize;

/// Record category; selects the file extension and catalog section of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct SnoGroup(pub i32);

macro_rules! sno_groups {
	($(($konst:ident, $id:literal, $name:literal, $ext:literal)),* $(,)?) => {
		impl SnoGroup {
			$(
				#[doc = concat!("`", $name, "` records.")]
				pub const $konst: Self = Self($id);
			)*

			/// Every known group, in id order.
			pub const KNOWN: &'static [Self] = &[$(Self::$konst),*];

			/// Display name; `Unknown` for unrecognized ids.
			pub fn name(self) -> &'static str {
				match self.0 {
					$($id => $name,)*
					_ => "Unknown",
				}
			}

			/// File extension including the dot; empty for unrecognized ids.
			pub fn extension(self) -> &'static str {
				match self.0 {
					$($id => $ext,)*
					_ => "",
				}
			}
		}
	};
}

sno_groups! {
	(UNKNOWN, -3, "Unknown", ""),
	(CODE, -2, "Code", ""),
	(NONE, -1, "None", ""),
	(ACTOR, 1, "Actor", ".acr"),
	(NPC_COMPONENT_SET, 2, "NPCComponentSet", ".npc"),
	(AI_BEHAVIOR, 3, "AIBehavior", ".aib"),
	(AI_STATE, 4, "AIState", ".ais"),
	(AMBIENT_SOUND, 5, "AmbientSound", ".ams"),
	(ANIM, 6, "Anim", ".ani"),
	(ANIM_2D, 7, "Anim2D", ".an2"),
	(ANIM_SET, 8, "AnimSet", ".ans"),
	(APPEARANCE, 9, "Appearance", ".app"),
	(HERO, 10, "Hero", ".hro"),
	(CLOTH, 11, "Cloth", ".clt"),
	(CONVERSATION, 12, "Conversation", ".cnv"),
	(CONVERSATION_LIST, 13, "ConversationList", ".cnl"),
	(EFFECT_GROUP, 14, "EffectGroup", ".efg"),
	(ENCOUNTER, 15, "Encounter", ".enc"),
	(EXPLOSION, 17, "Explosion", ".xpl"),
	(FLAG_SET, 18, "FlagSet", ".flg"),
	(FONT, 19, "Font", ".fnt"),
	(GAME_BALANCE, 20, "GameBalance", ".gam"),
	(GLOBAL, 21, "Global", ".glo"),
	(LEVEL_AREA, 22, "LevelArea", ".lvl"),
	(LIGHT, 23, "Light", ".lit"),
	(MARKER_SET, 24, "MarkerSet", ".mrk"),
	(OBSERVER, 26, "Observer", ".obs"),
	(PARTICLE, 27, "Particle", ".prt"),
	(PHYSICS, 28, "Physics", ".phy"),
	(POWER, 29, "Power", ".pow"),
	(QUEST, 31, "Quest", ".qst"),
	(ROPE, 32, "Rope", ".rop"),
	(SCENE, 33, "Scene", ".scn"),
	(SCRIPT, 35, "Script", ".scr"),
	(SHADER_MAP, 36, "ShaderMap", ".shm"),
	(SHADER, 37, "Shader", ".shd"),
	(SHAKE, 38, "Shake", ".shk"),
	(SKILL_KIT, 39, "SkillKit", ".skl"),
	(SOUND, 40, "Sound", ".snd"),
	(STRING_LIST, 42, "StringList", ".stl"),
	(SURFACE, 43, "Surface", ".srf"),
	(TEXTURE, 44, "Texture", ".tex"),
	(TRAIL, 45, "Trail", ".trl"),
	(UI, 46, "UI", ".ui"),
	(WEATHER, 47, "Weather", ".wth"),
	(WORLD, 48, "World", ".wrl"),
	(RECIPE, 49, "Recipe", ".rcp"),
	(CONDITION, 51, "Condition", ".cnd"),
	(TREASURE_CLASS, 52, "TreasureClass", ".trs"),
	(ACCOUNT, 53, "Account", ".acc"),
	(MATERIAL, 57, "Material", ".mat"),
	(LORE, 59, "Lore", ".lor"),
	(REVERB, 60, "Reverb", ".rev"),
	(MUSIC, 62, "Music", ".mus"),
	(TUTORIAL, 63, "Tutorial", ".tut"),
	(ANIM_TREE, 67, "AnimTree", ".ant"),
	(VIBRATION, 68, "Vibration", ".vib"),
	(WWISE_SOUND_BANK, 71, "wWiseSoundBank", ".wsb"),
	(SPEAKER, 72, "Speaker", ".spk"),
	(ITEM, 73, "Item", ".itm"),
	(PLAYER_CLASS, 74, "PlayerClass", ".pcl"),
	(FOG_VOLUME, 76, "FogVolume", ".fog"),
	(BIOME, 77, "Biome", ".bio"),
	(WALL, 78, "Wall", ".wal"),
	(SOUND_TABLE, 79, "SoundTable", ".sdt"),
	(SUBZONE, 80, "Subzone", ".sbz"),
	(MATERIAL_VALUE, 81, "MaterialValue", ".mtv"),
	(MONSTER_FAMILY, 82, "MonsterFamily", ".mfm"),
	(TILE_SET, 83, "TileSet", ".tst"),
	(POPULATION, 84, "Population", ".pop"),
	(MATERIAL_VALUE_SET, 85, "MaterialValueSet", ".mvs"),
	(WORLD_STATE, 86, "WorldState", ".wst"),
	(SCHEDULE, 87, "Schedule", ".sch"),
	(VECTOR_FIELD, 88, "VectorField", ".vfd"),
	(STORYBOARD, 90, "Storyboard", ".stb"),
	(TERRITORY, 92, "Territory", ".ter"),
	(AUDIO_CONTEXT, 93, "AudioContext", ".auc"),
	(VO_PROCESS, 94, "VOProcess", ".vop"),
	(DEMON_SCROLL, 95, "DemonScroll", ".dss"),
	(QUEST_CHAIN, 96, "QuestChain", ".qc"),
	(LOUDNESS_PRESET, 97, "LoudnessPreset", ".lou"),
	(ITEM_TYPE, 98, "ItemType", ".itt"),
	(ACHIEVEMENT, 99, "Achievement", ".ach"),
	(CRAFTER, 100, "Crafter", ".crf"),
	(HOUDINI_PARTICLES_SIM, 101, "HoudiniParticlesSim", ".hps"),
	(MOVIE, 102, "Movie", ".vid"),
	(TILED_STYLE, 103, "TiledStyle", ".tsl"),
	(AFFIX, 104, "Affix", ".aff"),
	(REPUTATION, 105, "Reputation", ".rep"),
	(PARAGON_NODE, 106, "ParagonNode", ".pgn"),
	(MONSTER_AFFIX, 107, "MonsterAffix", ".maf"),
	(PARAGON_BOARD, 108, "ParagonBoard", ".pbd"),
	(SET_ITEM_BONUS, 109, "SetItemBonus", ".set"),
	(STORE_PRODUCT, 110, "StoreProduct", ".prd"),
	(PARAGON_GLYPH, 111, "ParagonGlyph", ".gph"),
	(PARAGON_GLYPH_AFFIX, 112, "ParagonGlyphAffix", ".gaf"),
	(CHALLENGE, 114, "Challenge", ".cha"),
	(MARKING_SHAPE, 115, "MarkingShape", ".msh"),
	(ITEM_REQUIREMENT, 116, "ItemRequirement", ".irq"),
	(BOOST, 117, "Boost", ".bst"),
	(EMOTE, 118, "Emote", ".emo"),
	(JEWELRY, 119, "Jewelry", ".jwl"),
	(PLAYER_TITLE, 120, "PlayerTitle", ".pt"),
	(EMBLEM, 121, "Emblem", ".emb"),
	(DYE, 122, "Dye", ".dye"),
	(FOG_OF_WAR, 123, "FogOfWar", ".fow"),
	(PARAGON_THRESHOLD, 124, "ParagonThreshold", ".pth"),
	(AI_AWARENESS, 125, "AIAwareness", ".aia"),
	(TRACKED_REWARD, 126, "TrackedReward", ".trd"),
	(COLLISION_SETTINGS, 127, "CollisionSettings", ".col"),
	(ASPECT, 128, "Aspect", ".asp"),
	(AB_TEST, 129, "ABTest", ".abt"),
	(STAGGER, 130, "Stagger", ".stg"),
	(EYE_COLOR, 131, "EyeColor", ".eye"),
	(MAKEUP, 132, "Makeup", ".mak"),
	(MARKING_COLOR, 133, "MarkingColor", ".mcl"),
	(HAIR_COLOR, 134, "HairColor", ".hcl"),
	(DUNGEON_AFFIX, 135, "DungeonAffix", ".dax"),
	(ACTIVITY, 136, "Activity", ".act"),
	(SEASON, 137, "Season", ".sea"),
	(HAIR_STYLE, 138, "HairStyle", ".har"),
	(FACIAL_HAIR, 139, "FacialHair", ".fhr"),
	(FACE, 140, "Face", ".fac"),
	(MERCENARY_CLASS, 141, "MercenaryClass", ".mrc"),
	(PASSIVE_POWER_CONTAINER, 142, "PassivePowerContainer", ".ppc"),
	(MOUNT_PROFILE, 143, "MountProfile", ".mpp"),
	(AI_COORDINATOR, 144, "AICoordinator", ".aic"),
	(CRAFTER_TAB, 145, "CrafterTab", ".ctb"),
	(TOWN_PORTAL_COSMETIC, 146, "TownPortalCosmetic", ".tpc"),
	(AXE_TEST, 147, "AxeTest", ".axe"),
	(WIZARD, 148, "Wizard", ".wiz"),
	(FOOTSTEP_TABLE, 149, "FootstepTable", ".fst"),
	(MODAL, 150, "Modal", ".mdl"),
	(COLLECTIBLE_POWER, 151, "CollectiblePower", ".cpw"),
	(APPEARENCE_SET, 152, "AppearenceSet", ".aps"),
	(PRESET, 153, "Preset", ".pst"),
}

impl SnoGroup {
	/// Return `true` when the id has a known name.
	pub fn is_known(self) -> bool {
		Self::KNOWN.contains(&self)
	}

	/// Resolve a group by display name.
	pub fn from_name(name: &str) -> Option<Self> {
		Self::KNOWN.iter().copied().find(|group| group.name() == name)
	}
}

impl From<i32> for SnoGroup {
	fn from(value: i32) -> Self {
		Self(value)
	}
}

impl fmt::Display for SnoGroup {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}
