/*
 * SPDX-FileCopyrightText: Copyright (c) 2026 NVIDIA CORPORATION & AFFILIATES. All rights reserved.
 * SPDX-License-Identifier: Apache-2.0
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 * http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 */

use std::net::Ipv4Addr;

use ipnetwork::Ipv4Network;
use mac_address::MacAddress;

use crate::errors::AllocationError;
use crate::interval_pool::IntervalPool;

/// Hands out tunnel endpoint identities: an IPv4 address from the configured
/// VTEP subnet and a MAC address under the configured OUI.
///
/// The IP pool covers the host bits `[1, 2^(32-prefix) - 2]`, keeping the
/// all-zeros and all-ones host addresses reserved. The MAC pool covers the
/// 24-bit NIC suffix `[1, 2^24 - 2]`.
pub struct VtepAllocator {
    network: Ipv4Network,
    oui: MacAddress,
    free_ip: IntervalPool,
    free_mac: IntervalPool,
}

impl VtepAllocator {
    /// `oui` must have its lower three bytes zeroed; configuration
    /// validation guarantees this before an allocator is built.
    pub fn new(network: Ipv4Network, oui: MacAddress) -> Self {
        let free_ip = if network.prefix() >= 31 {
            IntervalPool::exhausted()
        } else {
            let end = ((1u64 << (32 - network.prefix())) - 2) as u32;
            IntervalPool::new(1, end)
        };

        VtepAllocator {
            network,
            oui,
            free_ip,
            free_mac: IntervalPool::new(1, (1 << 24) - 2),
        }
    }

    /// Allocates the lowest free VTEP address, returned at the VTEP subnet's
    /// prefix length.
    pub fn allocate_ip(&mut self) -> Result<Ipv4Network, AllocationError> {
        let host = self
            .free_ip
            .allocate_lowest()
            .ok_or(AllocationError::Exhausted("VTEP IP"))?;

        let address = u32::from(self.network.network()) + host;
        Ok(network_at(address, self.network.prefix()))
    }

    /// Returns a previously allocated VTEP address to the pool.
    pub fn deallocate_ip(&mut self, network: Ipv4Network) -> Result<(), AllocationError> {
        if network.prefix() != self.network.prefix() {
            return Err(AllocationError::PrefixMismatch {
                expected: self.network.prefix(),
                got: network.prefix(),
            });
        }

        let host = u32::from(network.ip()) & !u32::from(self.network.mask());
        self.free_ip.deallocate(host);
        Ok(())
    }

    /// Allocates the lowest free NIC suffix and stamps the configured OUI on
    /// top of it.
    pub fn allocate_mac(&mut self) -> Result<MacAddress, AllocationError> {
        let nic = self
            .free_mac
            .allocate_lowest()
            .ok_or(AllocationError::Exhausted("VTEP MAC"))?;

        let [_, n1, n2, n3] = nic.to_be_bytes();
        let oui = self.oui.bytes();
        Ok(MacAddress::new([oui[0], oui[1], oui[2], n1, n2, n3]))
    }

    /// Returns a previously allocated MAC to the pool. MACs that do not carry
    /// the configured OUI were never handed out by this allocator.
    pub fn deallocate_mac(&mut self, mac: MacAddress) -> Result<(), AllocationError> {
        let bytes = mac.bytes();
        if bytes[..3] != self.oui.bytes()[..3] {
            return Err(AllocationError::ForeignOui(mac));
        }

        let nic = u32::from_be_bytes([0, bytes[3], bytes[4], bytes[5]]);
        self.free_mac.deallocate(nic);
        Ok(())
    }
}

/// Builds an `Ipv4Network` from a host-order address and a vetted prefix.
fn network_at(address: u32, prefix: u8) -> Ipv4Network {
    Ipv4Network::new(Ipv4Addr::from(address), prefix)
        .expect("prefix comes from an existing Ipv4Network")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn allocator() -> VtepAllocator {
        VtepAllocator::new(
            "44.128.0.0/20".parse().unwrap(),
            "70:B3:D5:00:00:00".parse().unwrap(),
        )
    }

    #[test]
    fn test_allocates_sequential_vtep_ips() {
        let mut vtep = allocator();
        assert_eq!(
            vtep.allocate_ip().unwrap().to_string(),
            "44.128.0.1/20".to_string()
        );
        assert_eq!(
            vtep.allocate_ip().unwrap().to_string(),
            "44.128.0.2/20".to_string()
        );
    }

    #[test]
    fn test_deallocated_ip_is_reused() {
        let mut vtep = allocator();
        let first = vtep.allocate_ip().unwrap();
        let second = vtep.allocate_ip().unwrap();

        vtep.deallocate_ip(first).unwrap();
        assert_eq!(vtep.allocate_ip().unwrap(), first);

        vtep.deallocate_ip(second).unwrap();
        vtep.deallocate_ip(first).unwrap();
        assert_eq!(vtep.allocate_ip().unwrap(), first);
        assert_eq!(vtep.allocate_ip().unwrap(), second);
    }

    #[test]
    fn test_deallocate_ip_rejects_a_different_prefix() {
        let mut vtep = allocator();
        let err = vtep
            .deallocate_ip("44.128.0.1/24".parse().unwrap())
            .unwrap_err();
        assert!(matches!(
            err,
            AllocationError::PrefixMismatch {
                expected: 20,
                got: 24
            }
        ));
    }

    #[test]
    fn test_macs_carry_the_oui_and_count_up() {
        let mut vtep = allocator();
        assert_eq!(
            vtep.allocate_mac().unwrap(),
            MacAddress::new([0x70, 0xB3, 0xD5, 0x00, 0x00, 0x01])
        );
        assert_eq!(
            vtep.allocate_mac().unwrap(),
            MacAddress::new([0x70, 0xB3, 0xD5, 0x00, 0x00, 0x02])
        );
    }

    #[test]
    fn test_nic_suffix_is_encoded_big_endian() {
        let mut vtep = allocator();
        // Put a multi-byte suffix back into the pool and check it round-trips
        // through the byte layout.
        let mac = MacAddress::new([0x70, 0xB3, 0xD5, 0x01, 0x02, 0x03]);
        vtep.deallocate_mac(mac).unwrap();
        // 1 is still the lowest free suffix; 0x010203 only comes back after
        // the contiguous run below it is exhausted.
        assert_eq!(
            vtep.allocate_mac().unwrap(),
            MacAddress::new([0x70, 0xB3, 0xD5, 0x00, 0x00, 0x01])
        );

        let mut drained = VtepAllocator {
            free_mac: IntervalPool::exhausted(),
            ..allocator()
        };
        drained.deallocate_mac(mac).unwrap();
        assert_eq!(drained.allocate_mac().unwrap(), mac);
    }

    #[test]
    fn test_deallocate_mac_rejects_a_foreign_oui() {
        let mut vtep = allocator();
        let err = vtep
            .deallocate_mac(MacAddress::new([0x02, 0x42, 0xAC, 0x00, 0x00, 0x01]))
            .unwrap_err();
        assert!(matches!(err, AllocationError::ForeignOui(_)));
    }

    #[test]
    fn test_small_vtep_subnets_have_no_addresses() {
        let mut vtep = VtepAllocator::new(
            "44.128.0.0/31".parse().unwrap(),
            "70:B3:D5:00:00:00".parse().unwrap(),
        );
        assert!(matches!(
            vtep.allocate_ip().unwrap_err(),
            AllocationError::Exhausted(_)
        ));
        // The MAC pool is independent of the subnet size.
        assert!(vtep.allocate_mac().is_ok());
    }
}
