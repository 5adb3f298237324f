use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// Macro to generate a field enum with as_str + FromStr + canonical ordering.
macro_rules! field_enum {
    ($name:ident { $($variant:ident => $s:literal : $kind:ident),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            /// Every field, in canonical record order.
            pub const ALL: &'static [$name] = &[$(Self::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }

            /// Natural numeric type of the field's values.
            pub fn kind(&self) -> ValueKind {
                match self {
                    $(Self::$variant => ValueKind::$kind),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = UnknownField;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(UnknownField(s.to_string())),
                }
            }
        }
    };
}

field_enum!(Field {
    Glucose => "glucose": Float,
    BloodPressure => "blood_pressure": Int,
    Bmi => "bmi": Float,
    Age => "age": Int,
    Insulin => "insulin": Float,
    SkinThickness => "skin_thickness": Float,
    Pregnancies => "pregnancies": Int,
    DiabetesPedigreeFunction => "diabetes_pedigree_function": Float,
    RadiusMean => "radius_mean": Float,
    TextureMean => "texture_mean": Float,
    PerimeterMean => "perimeter_mean": Float,
    AreaMean => "area_mean": Float,
    SmoothnessMean => "smoothness_mean": Float,
});

impl Field {
    fn index(self) -> usize {
        self as usize
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown feature field: {0}")]
pub struct UnknownField(pub String);

/// Counts are integers, measurements are floats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Int,
    Float,
}

/// A value read out of report text.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureValue {
    Int(i64),
    Float(f64),
}

impl FeatureValue {
    pub fn as_f64(&self) -> f64 {
        match *self {
            Self::Int(v) => v as f64,
            Self::Float(v) => v,
        }
    }
}

impl std::fmt::Display for FeatureValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
        }
    }
}

const FIELD_COUNT: usize = 13;

/// Canonical result of running every extractor over one report.
///
/// One slot per [`Field`], so the key set is fixed no matter what the text
/// contained. Serializes as a JSON object holding all keys, `null` for misses.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureRecord {
    values: [Option<FeatureValue>; FIELD_COUNT],
}

impl FeatureRecord {
    /// Build a record from extractor output. Fields not listed stay absent.
    pub fn from_values(values: impl IntoIterator<Item = (Field, Option<FeatureValue>)>) -> Self {
        let mut record = Self::default();
        for (field, value) in values {
            record.values[field.index()] = value;
        }
        record
    }

    pub fn get(&self, field: Field) -> Option<FeatureValue> {
        self.values[field.index()]
    }

    pub fn is_present(&self, field: Field) -> bool {
        self.get(field).is_some()
    }

    /// All (field, value) pairs in canonical order, absent ones included.
    pub fn iter(&self) -> impl Iterator<Item = (Field, Option<FeatureValue>)> + '_ {
        Field::ALL.iter().map(move |&f| (f, self.get(f)))
    }

    pub fn present_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_some()).count()
    }

    /// Fields that were not found, in canonical order.
    pub fn missing(&self) -> Vec<Field> {
        self.iter()
            .filter(|(_, v)| v.is_none())
            .map(|(f, _)| f)
            .collect()
    }
}

impl Serialize for FeatureRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(FIELD_COUNT))?;
        for (field, value) in self.iter() {
            map.serialize_entry(field.as_str(), &value)?;
        }
        map.end()
    }
}
