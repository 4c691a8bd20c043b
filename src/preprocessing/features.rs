use crate::error::{FieldError, InferenceError};
use serde::Serialize;
use serde_json::{Map, Value};

/// Column names the classifier was trained with, in training order.
pub const FEATURE_NAMES: [&str; 8] = [
    "Pregnancies",
    "Glucose",
    "BloodPressure",
    "SkinThickness",
    "Insulin",
    "BMI",
    "DiabetesPedigreeFunction",
    "Age",
];

/// One patient's measurements, validated.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct FeatureRecord {
    pub pregnancies: u32,
    pub glucose: f64,
    pub blood_pressure: f64,
    pub skin_thickness: f64,
    pub insulin: f64,
    #[serde(rename = "BMI")]
    pub bmi: f64,
    pub diabetes_pedigree_function: f64,
    pub age: u32,
}

/// A single named row, shaped the way the model saw its training data.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRow {
    columns: Vec<(&'static str, f64)>,
}

impl FeatureRow {
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.columns.iter().map(|(name, _)| *name)
    }

    pub fn values(&self) -> Vec<f64> {
        self.columns.iter().map(|(_, v)| *v).collect()
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.columns
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| *v)
    }
}

impl FeatureRecord {
    /// Validates an untrusted JSON body. Every offending field is reported,
    /// not just the first one.
    pub fn from_json(body: &Value) -> Result<Self, InferenceError> {
        let object = body
            .as_object()
            .ok_or_else(|| InferenceError::MalformedBody("expected a JSON object".to_string()))?;

        let mut errors = Vec::new();
        let mut field = |name: &str, integer: bool| -> f64 {
            match read_field(object, name, integer) {
                Ok(v) => v,
                Err(e) => {
                    errors.push(e);
                    0.0
                }
            }
        };

        let pregnancies = field("Pregnancies", true);
        let glucose = field("Glucose", false);
        let blood_pressure = field("BloodPressure", false);
        let skin_thickness = field("SkinThickness", false);
        let insulin = field("Insulin", false);
        let bmi = field("BMI", false);
        let diabetes_pedigree_function = field("DiabetesPedigreeFunction", false);
        let age = field("Age", true);

        if !errors.is_empty() {
            return Err(InferenceError::InvalidInput(errors));
        }

        Ok(Self {
            pregnancies: pregnancies as u32,
            glucose,
            blood_pressure,
            skin_thickness,
            insulin,
            bmi,
            diabetes_pedigree_function,
            age: age as u32,
        })
    }

    /// Adapts the record into the model's input row, keyed by training-time names.
    pub fn to_row(&self) -> FeatureRow {
        let values = [
            f64::from(self.pregnancies),
            self.glucose,
            self.blood_pressure,
            self.skin_thickness,
            self.insulin,
            self.bmi,
            self.diabetes_pedigree_function,
            f64::from(self.age),
        ];
        FeatureRow {
            columns: FEATURE_NAMES.into_iter().zip(values).collect(),
        }
    }
}

fn read_field(object: &Map<String, Value>, name: &str, integer: bool) -> Result<f64, FieldError> {
    let value = match object.get(name) {
        None | Some(Value::Null) => return Err(FieldError::new(name, "missing")),
        Some(value) => value,
    };

    let number = value
        .as_f64()
        .filter(|n| n.is_finite())
        .ok_or_else(|| FieldError::new(name, "must be a number"))?;

    if number < 0.0 {
        return Err(FieldError::new(name, "must be >= 0"));
    }
    if integer && number.fract() != 0.0 {
        return Err(FieldError::new(name, "must be an integer"));
    }
    if integer && number > f64::from(u32::MAX) {
        return Err(FieldError::new(name, format!("must be <= {}", u32::MAX)));
    }

    Ok(number)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn example() -> Value {
        json!({
            "Pregnancies": 1,
            "Glucose": 120,
            "BloodPressure": 70,
            "SkinThickness": 30,
            "Insulin": 0,
            "BMI": 25.5,
            "DiabetesPedigreeFunction": 0.3,
            "Age": 22
        })
    }

    fn rejected_fields(body: Value) -> Vec<FieldError> {
        match FeatureRecord::from_json(&body) {
            Err(InferenceError::InvalidInput(fields)) => fields,
            other => panic!("expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_valid_record() {
        let record = FeatureRecord::from_json(&example()).unwrap();
        assert_eq!(record.pregnancies, 1);
        assert_eq!(record.glucose, 120.0);
        assert_eq!(record.bmi, 25.5);
        assert_eq!(record.age, 22);
    }

    #[test]
    fn test_negative_pregnancies_rejected() {
        let mut body = example();
        body["Pregnancies"] = json!(-1);
        assert_eq!(
            rejected_fields(body),
            vec![FieldError::new("Pregnancies", "must be >= 0")]
        );
    }

    #[test]
    fn test_all_offending_fields_reported() {
        let mut body = example();
        body.as_object_mut().unwrap().remove("Age");
        body["Glucose"] = json!("high");
        body["Insulin"] = json!(-0.5);

        let fields = rejected_fields(body);
        assert_eq!(
            fields,
            vec![
                FieldError::new("Glucose", "must be a number"),
                FieldError::new("Insulin", "must be >= 0"),
                FieldError::new("Age", "missing"),
            ]
        );
    }

    #[test]
    fn test_integer_fields_accept_whole_floats_only() {
        let mut body = example();
        body["Age"] = json!(22.0);
        assert_eq!(FeatureRecord::from_json(&body).unwrap().age, 22);

        body["Pregnancies"] = json!(1.5);
        assert_eq!(
            rejected_fields(body),
            vec![FieldError::new("Pregnancies", "must be an integer")]
        );
    }

    #[test]
    fn test_integer_fields_above_u32_are_out_of_range() {
        let mut body = example();
        body["Age"] = json!(5_000_000_000u64);
        body["Pregnancies"] = json!(1e300);
        assert_eq!(
            rejected_fields(body),
            vec![
                FieldError::new("Pregnancies", "must be <= 4294967295"),
                FieldError::new("Age", "must be <= 4294967295"),
            ]
        );
    }

    #[test]
    fn test_huge_measurements_stay_finite_in_row() {
        let mut body = example();
        body["Glucose"] = json!(1e39);
        body["BloodPressure"] = json!(1e39);
        let row = FeatureRecord::from_json(&body).unwrap().to_row();
        assert_eq!(row.get("Glucose"), Some(1e39));
        assert!(row.values().iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_null_counts_as_missing() {
        let mut body = example();
        body["BMI"] = Value::Null;
        assert_eq!(rejected_fields(body), vec![FieldError::new("BMI", "missing")]);
    }

    #[test]
    fn test_non_object_body_is_malformed() {
        let result = FeatureRecord::from_json(&json!([1, 2, 3]));
        assert!(matches!(result, Err(InferenceError::MalformedBody(_))));
    }

    #[test]
    fn test_row_uses_training_names_in_order() {
        let row = FeatureRecord::from_json(&example()).unwrap().to_row();
        assert_eq!(row.names().collect::<Vec<_>>(), FEATURE_NAMES.to_vec());
        assert_eq!(
            row.values(),
            vec![1.0, 120.0, 70.0, 30.0, 0.0, 25.5, 0.3, 22.0]
        );
        assert_eq!(row.get("BMI"), Some(25.5));
        assert_eq!(row.get("Height"), None);
    }

    #[test]
    fn test_echo_uses_wire_names() {
        let record = FeatureRecord::from_json(&example()).unwrap();
        let echoed = serde_json::to_value(&record).unwrap();
        assert_eq!(echoed["Pregnancies"], json!(1));
        assert_eq!(echoed["BMI"], json!(25.5));
        assert_eq!(echoed["DiabetesPedigreeFunction"], json!(0.3));
        assert_eq!(echoed["Glucose"], json!(120.0));
    }
}
