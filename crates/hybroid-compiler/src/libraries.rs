//! Built-in library environments.
//!
//! The libraries are plain data: public constant bindings, enums and type
//! aliases that user code reaches through `Library::Name` or after
//! `use Library`. They are built once and shared read-only between sessions
//! through an [`Arc`].
//!
//! ## Libraries
//!
//! ```text
//! Builtin  - ToString, ParseSound and the vertex aliases, always visible
//! Pewpew   - engine entry points and enums
//! Fmath    - fixed-point math
//! Math     - floating-point math (not available to levels)
//! String   - text helpers
//! Table    - list helpers
//! ```

use std::sync::Arc;

use hybroid_core::{EnvId, Library, Span, Type};
use rustc_hash::FxHashMap;

use crate::values::{AliasVal, DeclRef, EnumVal, FunctionVal, Value, VariableVal};

/// Engine entity names accepted on the right of `is`/`isnt`.
pub const OFFICIAL_ENTITIES: &[&str] = &[
    "Asteroid",
    "YellowBaf",
    "Inertiac",
    "Mothership",
    "MothershipBullet",
    "RollingCube",
    "RollingSphere",
    "Ufo",
    "Wary",
    "Crowder",
    "Ship",
    "Bomb",
    "BlueBaf",
    "RedBaf",
    "WaryMissile",
    "UfoBullet",
    "PlayerBullet",
    "BombExplosion",
    "PlayerExplosion",
    "Bonus",
    "FloatingMessage",
    "Pointonium",
    "BonusImplosion",
    "Mace",
    "PlasmaField",
];

/// Whether `name` is an engine entity.
pub fn is_official_entity(name: &str) -> bool {
    OFFICIAL_ENTITIES.contains(&name)
}

// ============================================================================
// LibraryEnv
// ============================================================================

/// The members of one library.
#[derive(Debug, Clone)]
pub struct LibraryEnv {
    /// Which library this is
    pub library: Library,
    variables: FxHashMap<String, VariableVal>,
    enums: FxHashMap<String, EnumVal>,
    aliases: FxHashMap<String, AliasVal>,
}

impl LibraryEnv {
    fn new(library: Library) -> Self {
        Self {
            library,
            variables: FxHashMap::default(),
            enums: FxHashMap::default(),
            aliases: FxHashMap::default(),
        }
    }

    /// The environment handle of this library.
    pub fn id(&self) -> EnvId {
        self.library.env_id()
    }

    fn constant(&mut self, name: &str, value: Value) -> &mut Self {
        let var = VariableVal::new(name, value, Span::default())
            .public(true)
            .constant(true);
        self.variables.insert(name.to_string(), var);
        self
    }

    fn function(&mut self, name: &str, params: Vec<Type>, returns: Vec<Type>) -> &mut Self {
        self.constant(name, Value::Function(FunctionVal::new(params, returns)))
    }

    fn generic_function(
        &mut self,
        name: &str,
        generics: &[&str],
        params: Vec<Type>,
        returns: Vec<Type>,
    ) -> &mut Self {
        self.constant(
            name,
            Value::Function(FunctionVal::generic(generics, params, returns)),
        )
    }

    fn enumeration(&mut self, name: &str, fields: &[&str]) -> &mut Self {
        let val = EnumVal {
            ty: DeclRef::new(self.id(), name),
            span: Span::default(),
            is_pub: true,
            fields: fields.iter().map(|f| f.to_string()).collect(),
        };
        self.enums.insert(name.to_string(), val);
        self
    }

    fn alias(&mut self, name: &str, ty: Type) -> &mut Self {
        let val = AliasVal {
            ty,
            span: Span::default(),
            is_pub: true,
        };
        self.aliases.insert(name.to_string(), val);
        self
    }

    /// A constant or function by name.
    pub fn variable(&self, name: &str) -> Option<&VariableVal> {
        self.variables.get(name)
    }

    /// An enum by name.
    pub fn enum_val(&self, name: &str) -> Option<&EnumVal> {
        self.enums.get(name)
    }

    /// An alias by name.
    pub fn alias_val(&self, name: &str) -> Option<&AliasVal> {
        self.aliases.get(name)
    }

    /// Number of constants and functions.
    pub fn variable_count(&self) -> usize {
        self.variables.len()
    }
}

// ============================================================================
// Libraries
// ============================================================================

/// Every built-in library, indexed by [`Library`].
#[derive(Debug, Clone)]
pub struct Libraries {
    envs: Vec<LibraryEnv>,
}

impl Default for Libraries {
    fn default() -> Self {
        Self::new()
    }
}

impl Libraries {
    /// Build all libraries.
    pub fn new() -> Self {
        let envs = Library::ALL
            .iter()
            .map(|&library| {
                let mut env = LibraryEnv::new(library);
                match library {
                    Library::Builtin => builtin(&mut env),
                    Library::Pewpew => pewpew(&mut env),
                    Library::Fmath => fmath(&mut env),
                    Library::Math => math(&mut env),
                    Library::String => string(&mut env),
                    Library::Table => table(&mut env),
                }
                env
            })
            .collect();
        Self { envs }
    }

    /// Build all libraries behind a shared handle.
    pub fn shared() -> Arc<Libraries> {
        Arc::new(Self::new())
    }

    /// One library.
    pub fn get(&self, library: Library) -> &LibraryEnv {
        &self.envs[u8::from(library) as usize]
    }

    /// The library behind an environment handle, if it names one.
    pub fn by_id(&self, id: EnvId) -> Option<&LibraryEnv> {
        id.library().map(|library| self.get(library))
    }
}

fn pewpew_enum(name: &str) -> Type {
    Type::Enum {
        env: Library::Pewpew.env_id(),
        name: name.to_string(),
    }
}

fn builtin(env: &mut LibraryEnv) {
    let vertex = Type::list(Type::NUMBER);
    env.function("ToString", vec![Type::Object], vec![Type::TEXT])
        .function("ParseSound", vec![Type::TEXT], vec![Type::TEXT])
        .alias("Vertex", vertex.clone())
        .alias("Vertexes", Type::list(vertex.clone()))
        .alias("Segment", vertex.clone())
        .alias("Segments", Type::list(vertex.clone()))
        .alias("Colors", vertex);
}

fn pewpew(env: &mut LibraryEnv) {
    let fixed = || Type::FIXED;
    let entity = || Type::RawEntity;

    env.enumeration(
        "EntityType",
        &[
            "Asteroid",
            "YellowBaf",
            "Inertiac",
            "Mothership",
            "MothershipBullet",
            "RollingCube",
            "RollingSphere",
            "Ufo",
            "Wary",
            "Crowder",
            "CustomizableEntity",
            "Ship",
            "Bomb",
            "BlueBaf",
            "RedBaf",
            "WaryMissile",
            "UfoBullet",
            "PlayerBullet",
            "BombExplosion",
            "PlayerExplosion",
            "Bonus",
            "FloatingMessage",
            "Pointonium",
            "BonusImplosion",
            "Mace",
            "PlasmaField",
        ],
    )
    .enumeration(
        "MothershipType",
        &["Triangle", "Square", "Pentagon", "Hexagon", "Heptagon"],
    )
    .enumeration(
        "CannonType",
        &[
            "Single",
            "TicToc",
            "Double",
            "Triple",
            "FourDirections",
            "DoubleSwipe",
            "Hemisphere",
            "Shotgun",
            "Laser",
        ],
    )
    .enumeration(
        "CannonFreq",
        &[
            "Freq30", "Freq15", "Freq10", "Freq7_5", "Freq6", "Freq5", "Freq3", "Freq2", "Freq1",
        ],
    )
    .enumeration(
        "BombType",
        &["Freeze", "Repulsive", "Atomize", "SmallAtomize", "SmallFreeze"],
    )
    .enumeration("MaceType", &["DamagePlayers", "DamageEntities"])
    .enumeration(
        "BonusType",
        &["Reinstantiation", "Shield", "Speed", "Weapon", "Mace"],
    )
    .enumeration(
        "WeaponType",
        &[
            "Bullet",
            "FreezeExplosion",
            "RepulsiveExplosion",
            "AtomizeExplosion",
            "PlasmaField",
            "WallTrailLasso",
            "Mace",
        ],
    )
    .enumeration("AsteroidSize", &["Small", "Medium", "Large", "VeryLarge"]);

    env.function("Print", vec![Type::TEXT], vec![])
        .function("PrintDebugInfo", vec![], vec![])
        .function("SetLevelSize", vec![fixed(), fixed()], vec![])
        .function(
            "AddWall",
            vec![fixed(), fixed(), fixed(), fixed()],
            vec![Type::NUMBER],
        )
        .function("RemoveWall", vec![Type::NUMBER], vec![])
        .function(
            "AddUpdateCallback",
            vec![Type::function(vec![], vec![])],
            vec![],
        )
        .function("GetNumberOfPlayers", vec![], vec![Type::NUMBER])
        .function("IncreaseScore", vec![Type::NUMBER, Type::NUMBER], vec![])
        .function("GetPlayerScore", vec![Type::NUMBER], vec![Type::NUMBER])
        .function("StopGame", vec![], vec![])
        .function("GetAllEntities", vec![], vec![Type::list(entity())])
        .function(
            "GetEntitiesInRadius",
            vec![fixed(), fixed(), fixed()],
            vec![Type::list(entity())],
        )
        .function(
            "GetEntityCount",
            vec![pewpew_enum("EntityType")],
            vec![Type::NUMBER],
        )
        .function(
            "GetEntityType",
            vec![entity()],
            vec![pewpew_enum("EntityType")],
        )
        .function("NewEntity", vec![fixed(), fixed()], vec![entity()])
        .function("NewAsteroid", vec![fixed(), fixed()], vec![entity()])
        .function(
            "NewAsteroidWithSize",
            vec![fixed(), fixed(), pewpew_enum("AsteroidSize")],
            vec![entity()],
        )
        .function(
            "NewMothership",
            vec![fixed(), fixed(), pewpew_enum("MothershipType"), fixed()],
            vec![entity()],
        )
        .function(
            "NewPointonium",
            vec![fixed(), fixed(), Type::NUMBER],
            vec![entity()],
        )
        .function(
            "NewFloatingMessage",
            vec![fixed(), fixed(), Type::TEXT],
            vec![entity()],
        )
        .function("GetEntityPosition", vec![entity()], vec![fixed(), fixed()])
        .function("SetEntityPosition", vec![entity(), fixed(), fixed()], vec![])
        .function("EntityMove", vec![entity(), fixed(), fixed()], vec![])
        .function("SetEntityRadius", vec![entity(), fixed()], vec![])
        .function("IsEntityAlive", vec![entity()], vec![Type::BOOL])
        .function("IsEntityBeingDestroyed", vec![entity()], vec![Type::BOOL])
        .function("DestroyEntity", vec![entity()], vec![])
        .function("ExplodeEntity", vec![entity(), Type::NUMBER], vec![])
        .function("SpawnEntity", vec![entity(), Type::NUMBER], vec![])
        .function(
            "SetEntityMeshAngle",
            vec![entity(), Type::RADIAN, fixed(), fixed(), fixed()],
            vec![],
        )
        .function("SetEntityTag", vec![entity(), Type::NUMBER], vec![])
        .function("GetEntityTag", vec![entity()], vec![Type::NUMBER]);
}

fn fmath(env: &mut LibraryEnv) {
    env.function("MaxFixed", vec![], vec![Type::FIXED])
        .function(
            "RandomFixed",
            vec![Type::FIXED, Type::FIXED],
            vec![Type::FIXED],
        )
        .function(
            "RandomNumber",
            vec![Type::NUMBER, Type::NUMBER],
            vec![Type::NUMBER],
        )
        .function("Sqrt", vec![Type::FIXED], vec![Type::FIXED])
        .function(
            "FromFraction",
            vec![Type::NUMBER, Type::NUMBER],
            vec![Type::FIXED],
        )
        .function("ToNumber", vec![Type::FIXED], vec![Type::NUMBER])
        .function("ToFixed", vec![Type::NUMBER], vec![Type::FIXED])
        .function("AbsFixed", vec![Type::FIXED], vec![Type::FIXED])
        .function("Sincos", vec![Type::RADIAN], vec![Type::FIXED, Type::FIXED])
        .function("Atan2", vec![Type::FIXED, Type::FIXED], vec![Type::RADIAN])
        .function("Tau", vec![], vec![Type::RADIAN]);
}

fn math(env: &mut LibraryEnv) {
    let num = || Type::NUMBER;
    env.constant("Pi", Value::NUMBER)
        .constant("Huge", Value::NUMBER)
        .constant("MaxInt", Value::NUMBER)
        .constant("MinInt", Value::NUMBER)
        .function("Abs", vec![num()], vec![num()])
        .function("Ceil", vec![num()], vec![num()])
        .function("Floor", vec![num()], vec![num()])
        .function("Sqrt", vec![num()], vec![num()])
        .function("Sin", vec![num()], vec![num()])
        .function("Cos", vec![num()], vec![num()])
        .function("Tan", vec![num()], vec![num()])
        .function("Exp", vec![num()], vec![num()])
        .function("Log", vec![num()], vec![num()])
        .function("Deg", vec![num()], vec![num()])
        .function("Rad", vec![num()], vec![num()])
        .function("ToInt", vec![num()], vec![num()])
        .function("Fmod", vec![num(), num()], vec![num()])
        .function("Modf", vec![num()], vec![num(), num()])
        .function("Max", vec![num(), Type::variadic(num())], vec![num()])
        .function("Min", vec![num(), Type::variadic(num())], vec![num()])
        .function("Random", vec![num(), num()], vec![num()])
        .function("Type", vec![Type::Object], vec![Type::TEXT]);
}

fn string(env: &mut LibraryEnv) {
    let text = || Type::TEXT;
    let num = || Type::NUMBER;
    env.function("Byte", vec![text(), num()], vec![num()])
        .function("Char", vec![Type::variadic(num())], vec![text()])
        .function("Find", vec![text(), text()], vec![num(), num()])
        .function(
            "Format",
            vec![text(), Type::variadic(Type::Object)],
            vec![text()],
        )
        .function("Gsub", vec![text(), text(), text()], vec![text(), num()])
        .function("Len", vec![text()], vec![num()])
        .function("Lower", vec![text()], vec![text()])
        .function("Upper", vec![text()], vec![text()])
        .function("Rep", vec![text(), num()], vec![text()])
        .function("Reverse", vec![text()], vec![text()])
        .function("Sub", vec![text(), num(), num()], vec![text()]);
}

fn table(env: &mut LibraryEnv) {
    let t = || Type::Generic("T".to_string());
    env.function(
        "Concat",
        vec![Type::list(Type::TEXT), Type::TEXT],
        vec![Type::TEXT],
    )
    .generic_function("Insert", &["T"], vec![Type::list(t()), t()], vec![])
    .generic_function(
        "InsertAt",
        &["T"],
        vec![Type::list(t()), Type::NUMBER, t()],
        vec![],
    )
    .generic_function(
        "Remove",
        &["T"],
        vec![Type::list(t()), Type::NUMBER],
        vec![t()],
    )
    .generic_function("Sort", &["T"], vec![Type::list(t())], vec![]);
}
