use crate::base::neterror::NetError;

/// Address families a caller wants for a domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IpOption {
    pub ipv4_enable: bool,
    pub ipv6_enable: bool,
}

impl IpOption {
    pub const fn ipv4_only() -> Self {
        Self {
            ipv4_enable: true,
            ipv6_enable: false,
        }
    }

    pub const fn ipv6_only() -> Self {
        Self {
            ipv4_enable: false,
            ipv6_enable: true,
        }
    }

    pub const fn dual() -> Self {
        Self {
            ipv4_enable: true,
            ipv6_enable: true,
        }
    }
}

/// One resolution request: a hostname plus the families to query.
///
/// Built fresh per call. At least one family must be wanted; [`validate`]
/// enforces that before anything touches the network.
///
/// [`validate`]: ResolveRequest::validate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveRequest {
    pub host: String,
    pub want_ipv4: bool,
    pub want_ipv6: bool,
}

impl ResolveRequest {
    pub fn new(host: impl Into<String>, want_ipv4: bool, want_ipv6: bool) -> Self {
        Self {
            host: host.into(),
            want_ipv4,
            want_ipv6,
        }
    }

    pub fn ipv4(host: impl Into<String>) -> Self {
        Self::new(host, true, false)
    }

    pub fn ipv6(host: impl Into<String>) -> Self {
        Self::new(host, false, true)
    }

    pub fn dual(host: impl Into<String>) -> Self {
        Self::new(host, true, true)
    }

    pub fn from_option(host: impl Into<String>, option: IpOption) -> Self {
        Self::new(host, option.ipv4_enable, option.ipv6_enable)
    }

    pub fn validate(&self) -> Result<(), NetError> {
        if !self.want_ipv4 && !self.want_ipv6 {
            return Err(NetError::InvalidRequest);
        }
        Ok(())
    }

    /// Number of fetches this request fans out to.
    pub fn family_count(&self) -> usize {
        usize::from(self.want_ipv4) + usize::from(self.want_ipv6)
    }
}
