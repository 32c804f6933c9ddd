use chrono::{DateTime, Utc};

pub fn seconds_since(t: DateTime<Utc>) -> f32 {
  let t2 = Utc::now();
  let d = (t2 - t).to_std();
  if let Ok(d) = d {
    d.as_secs_f32()
  } else {
    0.0
  }
}

#[cfg(test)]
pub mod tests {
  use super::*;
  use chrono::Duration;

  #[test]
  fn test_seconds_since() {
    let t = Utc::now() - Duration::seconds(2);
    assert!(seconds_since(t) >= 2.0);
    // times in the future don't go negative
    let t = Utc::now() + Duration::seconds(60);
    assert_eq!(seconds_since(t), 0.0);
  }
}
