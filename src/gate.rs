use std::collections::BTreeSet;

/// Decides whether a user may request statistic reports at all.
pub trait AuthorizationGate {
  fn is_authorized(&self, user: &str) -> bool;
}

/// Lets everyone through; used when no allow-list is configured.
#[derive(Clone, Copy, Debug, Default)]
pub struct OpenGate;

impl AuthorizationGate for OpenGate {
  fn is_authorized(&self, _user: &str) -> bool {
    true
  }
}

#[derive(Clone, Debug, Default)]
pub struct AllowList {
  users: BTreeSet<String>,
}

impl AllowList {
  pub fn new<I, S>(users: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    Self {
      users: users.into_iter().map(Into::into).collect(),
    }
  }
}

impl AuthorizationGate for AllowList {
  fn is_authorized(&self, user: &str) -> bool {
    !user.is_empty() && self.users.contains(user)
  }
}
